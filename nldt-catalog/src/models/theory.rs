//! Theory documents
//!
//! One per domain: a title, intro lines and a section per category with
//! bullets, a "why not the neighbouring category" line and one worked
//! example. Example fields serialise as explicit `null` when no record of
//! that category exists.

use crate::models::Domain;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheorySection {
    #[serde(default)]
    pub bullets: Vec<String>,

    #[serde(default)]
    pub why_not: String,

    #[serde(default)]
    pub example_asset: Option<String>,

    #[serde(default)]
    pub example_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoryDocument {
    pub title: String,

    #[serde(default)]
    pub intro: Vec<String>,

    /// Category → section, in document order
    #[serde(default)]
    pub items: IndexMap<String, TheorySection>,
}

impl TheoryDocument {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

fn section(bullets: [&str; 3], why_not: &str) -> TheorySection {
    TheorySection {
        bullets: bullets.iter().map(|b| b.to_string()).collect(),
        why_not: why_not.to_string(),
        example_asset: None,
        example_answer: None,
    }
}

const INTRO_SIMPLE_ENGLISH: &str = "Use simple English: 'This is a … It is used for …'.";

/// Built-in skeleton for a domain
pub fn builtin_skeleton(domain: Domain) -> TheoryDocument {
    match domain {
        Domain::Landmacht => land_skeleton(),
        Domain::Luchtmacht => air_skeleton(),
        Domain::Marine => sea_skeleton(),
    }
}

fn land_skeleton() -> TheoryDocument {
    let mut items = IndexMap::new();
    items.insert(
        "Combat vehicle".to_string(),
        section(
            [
                "Armoured vehicle built to fight.",
                "Carries a main gun, cannon or heavy weapon.",
                "Often tracked for movement off-road.",
            ],
            "Not a troop transport because its main role is combat, not carrying soldiers.",
        ),
    );
    items.insert(
        "Infantry / Troop transport".to_string(),
        section(
            [
                "Used to move soldiers safely to the fight.",
                "Protected against small arms and shrapnel.",
                "Usually lightly armed for self-defence.",
            ],
            "Not a combat vehicle because it is built to carry troops, not to lead the attack.",
        ),
    );
    items.insert(
        "Support vehicle".to_string(),
        section(
            [
                "Used for logistics, engineering, recovery or command.",
                "Keeps combat units supplied and moving.",
                "Often unarmoured or lightly protected.",
            ],
            "Used when the vehicle does not carry troops and is not built to fight.",
        ),
    );
    TheoryDocument {
        title: "Royal Netherlands Army – NATO role classification".to_string(),
        intro: vec![
            "In NATO recognition, classify vehicles by role first (what it is used for).".to_string(),
            INTRO_SIMPLE_ENGLISH.to_string(),
        ],
        items,
    }
}

fn air_skeleton() -> TheoryDocument {
    let mut items = IndexMap::new();
    items.insert(
        "Fighter Aircraft".to_string(),
        section(
            [
                "Used for air combat and precision strike missions.",
                "Fast aircraft with advanced sensors.",
                "Often armed and built for high performance.",
            ],
            "Not a transport aircraft because it is not designed to carry cargo or many passengers.",
        ),
    );
    items.insert(
        "Transport Aircraft".to_string(),
        section(
            [
                "Used to move people and cargo over distance.",
                "Large internal space for cargo or passengers.",
                "Often used for logistics and humanitarian support.",
            ],
            "Not a fighter aircraft because it is not built for air-to-air combat.",
        ),
    );
    items.insert(
        "Helicopter".to_string(),
        section(
            [
                "Can take off and land vertically.",
                "Can hover and fly at low speed.",
                "Used for transport, attack, and rescue.",
            ],
            "Not a fixed-wing aircraft because it uses rotors, not wings, for lift.",
        ),
    );
    items.insert(
        "Trainer Aircraft".to_string(),
        section(
            [
                "Used for pilot training.",
                "Usually lighter and simpler than combat aircraft.",
                "Often unarmed or lightly equipped.",
            ],
            "Not a fighter aircraft because its main role is training, not combat.",
        ),
    );
    items.insert(
        "Uncrewed Aerial System (UAS)".to_string(),
        section(
            [
                "No pilot onboard (remotely piloted or autonomous).",
                "Often used for surveillance and reconnaissance.",
                "Can stay airborne for long periods.",
            ],
            "Not a helicopter because it is uncrewed and operates differently.",
        ),
    );
    items.insert(
        "Other".to_string(),
        section(
            [
                "Special-purpose aircraft or items that do not fit the main roles.",
                "Classify by best match; if unsure, use Other.",
                "Instructor can discuss the closest NATO role.",
            ],
            "Used when the primary role is unclear or unique.",
        ),
    );
    TheoryDocument {
        title: "Royal Netherlands Air Force – NATO role classification".to_string(),
        intro: vec![
            "In NATO recognition, classify by role first (what it is used for).".to_string(),
            INTRO_SIMPLE_ENGLISH.to_string(),
        ],
        items,
    }
}

fn sea_skeleton() -> TheoryDocument {
    let mut items = IndexMap::new();
    items.insert(
        "Submarine".to_string(),
        section(
            [
                "Operates underwater for stealth.",
                "Used for intelligence and sea denial.",
                "Carries torpedoes and sensors.",
            ],
            "Not a surface ship because it operates mainly underwater.",
        ),
    );
    items.insert(
        "Frigate".to_string(),
        section(
            [
                "Multi-role warship for escort and task groups.",
                "Often used for air defence and anti-submarine warfare.",
                "Has advanced sensors and weapons.",
            ],
            "Not a patrol vessel because it has heavier combat capability.",
        ),
    );
    items.insert(
        "Patrol Vessel".to_string(),
        section(
            [
                "Used for maritime security and patrol tasks.",
                "Usually lighter weapons than major warships.",
                "Long endurance for presence at sea.",
            ],
            "Not a frigate because it has fewer sensors and lighter weapons.",
        ),
    );
    items.insert(
        "Amphibious Ship".to_string(),
        section(
            [
                "Used to transport troops and vehicles.",
                "Can support landings with landing craft and helicopters.",
                "Acts as a command and support platform.",
            ],
            "Not a frigate because its main role is transport and landing support.",
        ),
    );
    items.insert(
        "Mine Countermeasures Vessel".to_string(),
        section(
            [
                "Used to detect and neutralize sea mines.",
                "Specialized sonar and mine disposal systems.",
                "Often supports safe routes for other ships.",
            ],
            "Not a patrol vessel because its primary mission is mine warfare.",
        ),
    );
    items.insert(
        "Support Vessel".to_string(),
        section(
            [
                "Provides fuel, food, ammunition, or repairs at sea.",
                "Keeps task groups operational for longer.",
                "Usually not designed for front-line combat.",
            ],
            "Not a frigate because its main role is logistics, not combat.",
        ),
    );
    items.insert(
        "Other".to_string(),
        section(
            [
                "Special-purpose vessels that do not fit the main roles.",
                "Classify by best match; if unsure, use Other.",
                "Instructor can discuss the closest NATO role.",
            ],
            "Used when the primary role is unclear or unique.",
        ),
    );
    TheoryDocument {
        title: "Royal Netherlands Navy – NATO role classification".to_string(),
        intro: vec![
            "In NATO recognition, classify ships by role and capability.".to_string(),
            INTRO_SIMPLE_ENGLISH.to_string(),
        ],
        items,
    }
}
