// src/diet.rs - Static diet recommendation table keyed on patient profile

/// Patient gender, as supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Build diet recommendations from age band, gender, scan history and the
/// latest detection flag. A plain rule table, no algorithmic content.
pub fn recommendations(age: u32, gender: Gender, scan_count: u32, cancer_detected: bool) -> Vec<String> {
    let mut diet = Vec::new();

    // Age-based recommendations
    if age < 25 {
        diet.push("Add energy-rich fruits & smoothies for metabolism.".to_string());
    } else if age < 40 {
        diet.push("High-fiber foods like oats, spinach & broccoli.".to_string());
    } else if age < 60 {
        diet.push("Add green tea, reduce salt & oily foods.".to_string());
    } else {
        diet.push("Soft, easy-to-digest foods with light spices.".to_string());
    }

    // Gender-based recommendations
    match gender {
        Gender::Male => {
            diet.push("Increase protein intake: eggs, lentils, grilled fish.".to_string());
        }
        Gender::Female => {
            diet.push("Iron-rich foods: beets, spinach, dates, legumes.".to_string());
        }
        Gender::Other => {
            diet.push("Balanced plant-based diet recommended.".to_string());
        }
    }

    // History of cancer detection
    if cancer_detected {
        diet.push("Anti-inflammatory foods: turmeric, berries, green tea.".to_string());
        diet.push("Cruciferous vegetables: cabbage, kale, cauliflower.".to_string());
        diet.push("Avoid red meat, cheese & high-fat dairy.".to_string());
    } else {
        diet.push("Continue a balanced low-fat, low-sugar diet.".to_string());
    }

    // Scan count based
    if scan_count >= 3 {
        diet.push("Frequent scans detected - follow a consistent low-fat diet.".to_string());
        diet.push("Drink 3L water daily & avoid late-night meals.".to_string());
    }

    diet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn young_healthy_patient_gets_baseline_advice() {
        let diet = recommendations(20, Gender::Other, 1, false);
        assert_eq!(diet.len(), 3);
        assert!(diet[0].contains("energy-rich"));
        assert!(diet[2].contains("balanced low-fat"));
    }

    #[test]
    fn detection_adds_anti_inflammatory_rules() {
        let diet = recommendations(45, Gender::Female, 1, true);
        assert!(diet.iter().any(|d| d.contains("Anti-inflammatory")));
        assert!(diet.iter().any(|d| d.contains("Cruciferous")));
        assert!(!diet.iter().any(|d| d.contains("balanced low-fat, low-sugar")));
    }

    #[test]
    fn frequent_scans_add_two_extra_rules() {
        let baseline = recommendations(70, Gender::Male, 2, false);
        let frequent = recommendations(70, Gender::Male, 3, false);
        assert_eq!(frequent.len(), baseline.len() + 2);
        assert!(frequent.iter().any(|d| d.contains("Frequent scans")));
    }

    #[test]
    fn age_bands_are_left_inclusive() {
        assert!(recommendations(24, Gender::Other, 0, false)[0].contains("energy-rich"));
        assert!(recommendations(25, Gender::Other, 0, false)[0].contains("High-fiber"));
        assert!(recommendations(40, Gender::Other, 0, false)[0].contains("green tea"));
        assert!(recommendations(60, Gender::Other, 0, false)[0].contains("easy-to-digest"));
    }
}
