//! Declarative keyword tables, one per domain
//!
//! Rules are checked in order and the first match wins, so a more specific
//! category must come before a broader one that shares keywords (UAS before
//! Helicopter, Mine Countermeasures before Support). Keyword bags mix Dutch
//! and English terms; all keywords are lowercase.

use super::rule_engine::{Confidence, KeywordRule, RuleTable};
use crate::models::Domain;

const fn rule(category: &'static str, keywords: &'static [&'static str], confidence: Confidence) -> KeywordRule {
    KeywordRule {
        category,
        keywords,
        confidence,
    }
}

// Landmacht

const LAND_COMBAT: &str = "Combat vehicle";
const LAND_TROOP: &str = "Infantry / Troop transport";

static LAND: RuleTable = RuleTable {
    primary: &[
        rule(
            LAND_COMBAT,
            &[
                "tank", "ifv", "afv", "mbt", "armoured", "armored", "tracked", "leopard", "cv90",
                "pantserhouwitser", "houwitser", "howitzer", "gevechtsvoertuig", "rupsvoertuig",
            ],
            Confidence::High,
        ),
        rule(
            LAND_TROOP,
            &[
                "apc", "troop", "infantry", "infanterie", "carrier", "transport", "personnel",
                "personeel", "boxer", "bushmaster",
            ],
            Confidence::High,
        ),
    ],
    locator: &[
        rule(LAND_COMBAT, &["leopard", "cv90", "pantserhouwitser"], Confidence::High),
        rule(LAND_TROOP, &["boxer", "bushmaster"], Confidence::High),
        rule(LAND_COMBAT, &["tank"], Confidence::Medium),
        rule(LAND_TROOP, &["infanterie"], Confidence::Medium),
    ],
    fallback: "Support vehicle",
};

// Luchtmacht

const AIR_UAS: &str = "Uncrewed Aerial System (UAS)";
const AIR_HELICOPTER: &str = "Helicopter";
const AIR_TRAINER: &str = "Trainer Aircraft";
const AIR_FIGHTER: &str = "Fighter Aircraft";
const AIR_TRANSPORT: &str = "Transport Aircraft";

static AIR: RuleTable = RuleTable {
    primary: &[
        rule(
            AIR_UAS,
            &[
                "drone", "onbemand", "onbemande", "uav", "uas", "unmanned", "uncrewed", "mq-9", "mq9",
                "reaper",
            ],
            Confidence::High,
        ),
        rule(
            AIR_HELICOPTER,
            &["helikopter", "helicopter", "apache", "chinook", "nh90", "cougar"],
            Confidence::High,
        ),
        rule(
            AIR_TRAINER,
            &["lesvliegtuig", "trainer", "training", "pc-7", "pc7", "pilatus"],
            Confidence::High,
        ),
        rule(
            AIR_FIGHTER,
            &["jachtvliegtuig", "fighter", "f-35", "f35", "f-16", "f16"],
            Confidence::High,
        ),
        rule(
            AIR_TRANSPORT,
            &[
                "transport", "transportvliegtuig", "tanker", "tankvliegtuig", "kdc-10", "kdc10", "a330",
                "mrt", "c-130", "c130", "hercules", "gulfstream",
            ],
            Confidence::High,
        ),
    ],
    locator: &[
        rule(AIR_FIGHTER, &["f-35", "f-16"], Confidence::High),
        rule(AIR_HELICOPTER, &["apache", "chinook", "nh90"], Confidence::High),
        rule(AIR_HELICOPTER, &["helikopter"], Confidence::Medium),
    ],
    fallback: "Other",
};

// Marine

const SEA_SUBMARINE: &str = "Submarine";
const SEA_FRIGATE: &str = "Frigate";
const SEA_PATROL: &str = "Patrol Vessel";
const SEA_AMPHIBIOUS: &str = "Amphibious Ship";
const SEA_MCM: &str = "Mine Countermeasures Vessel";
const SEA_SUPPORT: &str = "Support Vessel";

static SEA: RuleTable = RuleTable {
    primary: &[
        rule(
            SEA_SUBMARINE,
            &["onderzeeboot", "submarine", "walrusklasse", "walrus-klasse", "walrus"],
            Confidence::High,
        ),
        rule(
            SEA_FRIGATE,
            &[
                "fregat", "frigate", "zeven provinci", "zevenprovincien", "lcf",
                "luchtverdedigings- en commandofregat", "m-fregat", "multipurpose fregat",
            ],
            Confidence::High,
        ),
        rule(
            SEA_PATROL,
            &[
                "patrouille", "patrol", "opv", "hollandklasse", "holland-klasse", "holland class",
                "offshore patrol",
            ],
            Confidence::High,
        ),
        rule(
            SEA_AMPHIBIOUS,
            &[
                "amfib", "amphib", "landingsschip", "landing platform", "rotterdam", "johan de witt",
                "johan-de-witt",
            ],
            Confidence::High,
        ),
        rule(
            SEA_MCM,
            &[
                "mijnenjager", "mijnenbestr", "mine counter", "mcm", "alkmaar", "alkmaarklasse",
                "alkmaar-klasse",
            ],
            Confidence::High,
        ),
        rule(
            SEA_SUPPORT,
            &[
                "bevoorrad", "support", "ondersteun", "tanker", "logistiek", "karel doorman", "doorman",
                "combat support", "hydrograf", "sleepboot", "hulpvaartuig",
            ],
            Confidence::High,
        ),
    ],
    locator: &[
        rule(SEA_SUBMARINE, &["onderzeeboot"], Confidence::High),
        rule(SEA_FRIGATE, &["fregat", "lcf"], Confidence::Medium),
        rule(SEA_PATROL, &["opv", "patrouille"], Confidence::Medium),
        rule(SEA_MCM, &["mijnen"], Confidence::Medium),
    ],
    fallback: "Other",
};

/// Rule table for a domain
pub fn rule_table(domain: Domain) -> &'static RuleTable {
    match domain {
        Domain::Landmacht => &LAND,
        Domain::Luchtmacht => &AIR,
        Domain::Marine => &SEA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercase_and_non_empty() {
        for domain in Domain::ALL {
            let table = rule_table(domain);
            for rule in table.primary.iter().chain(table.locator.iter()) {
                assert!(!rule.keywords.is_empty(), "{domain}: {} has no keywords", rule.category);
                for k in rule.keywords {
                    assert_eq!(*k, k.to_lowercase(), "{domain}: keyword {k} not lowercase");
                    assert!(!k.trim().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_primary_rules_are_high_confidence() {
        for domain in Domain::ALL {
            assert!(rule_table(domain)
                .primary
                .iter()
                .all(|r| r.confidence == Confidence::High));
        }
    }

    #[test]
    fn test_locator_categories_appear_in_primary_rules() {
        for domain in Domain::ALL {
            let table = rule_table(domain);
            for rule in table.locator {
                assert!(table.primary.iter().any(|p| p.category == rule.category));
            }
        }
    }
}
