//! Instruction template sent to the route text generator.

pub const DEFAULT_REGION: &str = "Kathmandu Valley";

/// Example queries offered before the first search
pub const DEFAULT_SUGGESTIONS: [&str; 5] = [
    "Ring Road (Ba 1 Ja 1234)",
    "Ratnapark to Bhaktapur",
    "Lagankhel to Budhanilkantha",
    "Kalanki to Thankot",
    "Koteshwor to Gongabu",
];

const MIN_STOPS: usize = 8;
const MAX_STOPS: usize = 10;

const SCHEMA: &str = r#"{
  "routeId": "string (optional)",
  "busNumber": "string",
  "routeName": "string",
  "description": "string",
  "frequencyMinutes": number,
  "firstBusTime": "HH:MM",
  "lastBusTime": "HH:MM",
  "trafficCondition": "Light" | "Moderate" | "Heavy",
  "trafficAnalysis": "string",
  "stops": [
    {
      "id": number,
      "name": "string",
      "distanceFromPreviousKm": number,
      "typicalTravelTimeMinutes": number,
      "landmark": "string or null"
    }
  ]
}"#;

#[derive(Clone, Debug)]
pub struct PromptTemplate {
    region: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

impl PromptTemplate {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Embed a user query into the fixed instructions.
    pub fn render(&self, query: &str) -> String {
        let region = &self.region;
        let query = query.trim();

        format!(
            "You are a transit assistant for the {region} bus network.\n\
             A rider is looking for the bus route matching: \"{query}\".\n\
             \n\
             1. Identify the route, its major stops in travel order, and its daily schedule.\n\
             2. Use the map tool to confirm where each stop is and to judge current or typical traffic along the route.\n\
             3. Rate traffic as exactly one of Light, Moderate or Heavy and explain the rating briefly.\n\
             4. Reply with one raw JSON object and nothing else. No markdown, no code fences.\n\
             \n\
             The object must follow this structure:\n\
             {SCHEMA}\n\
             \n\
             List between {MIN_STOPS} and {MAX_STOPS} stops. For the first stop, distanceFromPreviousKm and \
             typicalTravelTimeMinutes are 0. Times use the 24-hour HH:MM format."
        )
    }
}
