use time::{format_description::well_known::Rfc3339, OffsetDateTime};

const READING_SCHEMA: &str = r#"{
  "food_name": "short summary of the meal",
  "ingested_at": "ISO 8601 timestamp",
  "items": [
    {
      "name": "Item name",
      "quantity": "amount with unit",
      "nutrients": {"calories": 0, "protein": 0, "carbs": 0, "fats": 0, "fiber": 0, "sugar": 0, "sodium": 0}
    }
  ],
  "total_macros": {"calories": 0, "protein": 0, "carbs": 0, "fats": 0, "water_ml": 0},
  "micros": {
    "creatine_g": 0, "epa_mg": 0, "dha_mg": 0,
    "vitamin_a_iu": 0, "vitamin_c_mg": 0, "vitamin_d_iu": 0, "vitamin_e_mg": 0, "vitamin_k_mcg": 0,
    "vitamin_b1_thiamine_mg": 0, "vitamin_b2_riboflavin_mg": 0, "vitamin_b3_niacin_mg": 0,
    "vitamin_b5_pantothenic_acid_mg": 0, "vitamin_b6_pyridoxine_mg": 0, "vitamin_b7_biotin_mcg": 0,
    "vitamin_b9_folate_mcg": 0, "vitamin_b12_cobalamin_mcg": 0,
    "calcium_mg": 0, "sodium_mg": 0, "potassium_mg": 0, "magnesium_mg": 0, "phosphorus_mg": 0,
    "chloride_mg": 0, "iron_mg": 0, "zinc_mg": 0, "copper_mcg": 0, "manganese_mg": 0,
    "selenium_mcg": 0, "iodine_mcg": 0, "chromium_mcg": 0, "molybdenum_mcg": 0,
    "fiber_g": 0, "sugar_g": 0, "added_sugar_g": 0, "saturated_fat_g": 0, "cholesterol_mg": 0
  }
}"#;

const ITEMS_SCHEMA: &str = r#"{
  "items": [{"name": "Item name", "quantity": "amount with unit", "note": "assumption made"}],
  "time": "time string such as 10:30 am, or null",
  "confidence": "high|medium|low"
}"#;

pub fn reading(raw_text: &str, reference: OffsetDateTime) -> String {
    let reference = reference
        .format(&Rfc3339)
        .unwrap_or_else(|_| reference.to_string());
    format!(
        "You are a nutrition analyst. Convert the user's food log into nutrient data.\n\
         \n\
         Food log: \"{raw_text}\"\n\
         Current time: {reference}\n\
         \n\
         Rules:\n\
         - Use cooked weights unless the user says raw or dry.\n\
         - Use standard household portions (1 katori is about 150 g cooked).\n\
         - For supplements use the active ingredient, not the capsule weight.\n\
         - Any stated dosage (\"5g\", \"500mg\") must appear in micros.\n\
         - Resolve relative times against the current time and keep its date.\n\
         - Include only micronutrients that are meaningfully present. Omit zeros.\n\
         - Reply with JSON only, no prose and no markdown.\n\
         \n\
         Schema:\n{READING_SCHEMA}"
    )
}

pub fn items(raw_text: &str) -> String {
    format!(
        "Split the user's food log into distinct items with quantities.\n\
         \n\
         Food log: \"{raw_text}\"\n\
         \n\
         Rules:\n\
         - Give every item a quantity with a unit (slices, eggs, katori, g, ml, cups).\n\
         - Expand composite foods (2 sandwiches means 4 slices of bread).\n\
         - Extract the time if mentioned, even with typos.\n\
         - Explain assumptions in 'note' so the user can correct them.\n\
         - Reply with JSON only, no prose and no markdown.\n\
         \n\
         Schema:\n{ITEMS_SCHEMA}"
    )
}
