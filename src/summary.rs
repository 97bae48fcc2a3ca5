//! Data Summarizer
//!
//! Pure projections that shrink upstream payloads to a fixed, bounded
//! schema before they are embedded in model prompts. A full player record
//! runs to hundreds of fields (every troop, spell, and achievement); the
//! model only needs the handful below, and the prompt size must not grow
//! with the upstream payload.
//!
//! All three functions are total over well-typed JSON: missing fields
//! default instead of failing, and the input is never mutated.

use serde::Serialize;
use serde_json::Value;

// == Field Helpers ==

fn str_field(value: &Value, key: &str) -> String {
    value.get(key).and_then(Value::as_str).unwrap_or("").to_string()
}

fn opt_str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn u64_field(value: &Value, key: &str) -> u64 {
    value.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn f64_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

// == Player Summary ==

/// Reference to the clan a player belongs to.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClanRef {
    pub tag: String,
    pub name: String,
}

/// A hero and its current level.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeroSummary {
    pub name: String,
    pub level: u64,
}

/// Bounded projection of a player record.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub tag: String,
    pub name: String,
    pub town_hall_level: u64,
    pub exp_level: u64,
    pub trophies: u64,
    pub best_trophies: u64,
    pub war_stars: u64,
    pub attack_wins: u64,
    pub defense_wins: u64,
    pub donations: u64,
    pub donations_received: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clan: Option<ClanRef>,
    pub heroes: Vec<HeroSummary>,
}

/// Projects a full player record down to `PlayerSummary`.
pub fn summarize_player(player: &Value) -> PlayerSummary {
    let clan = player.get("clan").map(|clan| ClanRef {
        tag: str_field(clan, "tag"),
        name: str_field(clan, "name"),
    });

    let heroes = player
        .get("heroes")
        .and_then(Value::as_array)
        .map(|heroes| {
            heroes
                .iter()
                .map(|hero| HeroSummary {
                    name: str_field(hero, "name"),
                    level: u64_field(hero, "level"),
                })
                .collect()
        })
        .unwrap_or_default();

    PlayerSummary {
        tag: str_field(player, "tag"),
        name: str_field(player, "name"),
        town_hall_level: u64_field(player, "townHallLevel"),
        exp_level: u64_field(player, "expLevel"),
        trophies: u64_field(player, "trophies"),
        best_trophies: u64_field(player, "bestTrophies"),
        war_stars: u64_field(player, "warStars"),
        attack_wins: u64_field(player, "attackWins"),
        defense_wins: u64_field(player, "defenseWins"),
        donations: u64_field(player, "donations"),
        donations_received: u64_field(player, "donationsReceived"),
        role: opt_str_field(player, "role"),
        league: player
            .get("league")
            .map(|league| str_field(league, "name")),
        clan,
        heroes,
    }
}

// == Clan Summary ==

/// Bounded projection of a clan record.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClanSummary {
    pub tag: String,
    pub name: String,
    pub clan_level: u64,
    pub members: u64,
    pub clan_points: u64,
    pub required_trophies: u64,
    pub war_wins: u64,
    pub war_win_streak: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub war_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub war_league: Option<String>,
}

/// Projects a full clan record down to `ClanSummary`.
pub fn summarize_clan(clan: &Value) -> ClanSummary {
    ClanSummary {
        tag: str_field(clan, "tag"),
        name: str_field(clan, "name"),
        clan_level: u64_field(clan, "clanLevel"),
        members: u64_field(clan, "members"),
        clan_points: u64_field(clan, "clanPoints"),
        required_trophies: u64_field(clan, "requiredTrophies"),
        war_wins: u64_field(clan, "warWins"),
        war_win_streak: u64_field(clan, "warWinStreak"),
        war_frequency: opt_str_field(clan, "warFrequency"),
        war_league: clan
            .get("warLeague")
            .map(|league| str_field(league, "name")),
    }
}

// == War Summary ==

/// One side of a war record.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WarSide {
    pub tag: String,
    pub name: String,
    pub stars: u64,
    pub destruction_percentage: f64,
    pub attacks: u64,
}

/// Bounded projection of a war record.
///
/// A clan outside a war summarizes to the stable `{"state": "notInWar"}`
/// shape: the state field is always present and the side data is omitted
/// as a whole rather than field by field.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WarSummary {
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clan: Option<WarSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<WarSide>,
}

const NOT_IN_WAR: &str = "notInWar";

fn war_side(war: &Value, side: &str) -> Option<WarSide> {
    war.get(side).map(|side| WarSide {
        tag: str_field(side, "tag"),
        name: str_field(side, "name"),
        stars: u64_field(side, "stars"),
        destruction_percentage: f64_field(side, "destructionPercentage"),
        attacks: u64_field(side, "attacks"),
    })
}

/// Projects a full war record down to `WarSummary`.
pub fn summarize_war(war: &Value) -> WarSummary {
    let state = opt_str_field(war, "state").unwrap_or_else(|| NOT_IN_WAR.to_string());

    if state == NOT_IN_WAR {
        return WarSummary {
            state,
            team_size: None,
            start_time: None,
            end_time: None,
            clan: None,
            opponent: None,
        };
    }

    WarSummary {
        state,
        team_size: war.get("teamSize").and_then(Value::as_u64),
        start_time: opt_str_field(war, "startTime"),
        end_time: opt_str_field(war, "endTime"),
        clan: war_side(war, "clan"),
        opponent: war_side(war, "opponent"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // The documented schema per summary kind; anything else leaking into
    // the serialized output is a bug.
    const PLAYER_FIELDS: &[&str] = &[
        "tag",
        "name",
        "townHallLevel",
        "expLevel",
        "trophies",
        "bestTrophies",
        "warStars",
        "attackWins",
        "defenseWins",
        "donations",
        "donationsReceived",
        "role",
        "league",
        "clan",
        "heroes",
    ];
    const CLAN_FIELDS: &[&str] = &[
        "tag",
        "name",
        "clanLevel",
        "members",
        "clanPoints",
        "requiredTrophies",
        "warWins",
        "warWinStreak",
        "warFrequency",
        "warLeague",
    ];
    const WAR_FIELDS: &[&str] =
        &["state", "teamSize", "startTime", "endTime", "clan", "opponent"];

    fn assert_fields_within(value: &Value, allowed: &[&str]) {
        for key in value.as_object().unwrap().keys() {
            assert!(allowed.contains(&key.as_str()), "unexpected field {key}");
        }
    }

    fn big_player() -> Value {
        json!({
            "tag": "#2PP",
            "name": "Ada",
            "townHallLevel": 14,
            "expLevel": 201,
            "trophies": 5200,
            "bestTrophies": 5600,
            "warStars": 1500,
            "attackWins": 120,
            "defenseWins": 30,
            "donations": 800,
            "donationsReceived": 650,
            "role": "coLeader",
            "league": { "id": 29000022, "name": "Legend League" },
            "clan": { "tag": "#CLAN", "name": "The Order", "clanLevel": 20 },
            "heroes": [
                { "name": "Barbarian King", "level": 80, "maxLevel": 95, "village": "home" },
                { "name": "Archer Queen", "level": 85, "maxLevel": 95, "village": "home" },
            ],
            // large fields the summary must drop
            "troops": (0..100).map(|i| json!({"name": format!("t{i}"), "level": i})).collect::<Vec<_>>(),
            "achievements": (0..50).map(|i| json!({"name": format!("a{i}"), "value": i})).collect::<Vec<_>>(),
        })
    }

    #[test]
    fn test_player_summary_fields_are_bounded() {
        let summary = summarize_player(&big_player());
        let value = serde_json::to_value(&summary).unwrap();

        assert_fields_within(&value, PLAYER_FIELDS);
        assert_eq!(value["name"], "Ada");
        assert_eq!(value["townHallLevel"], 14);
        assert_eq!(value["league"], "Legend League");
        assert_eq!(value["clan"]["tag"], "#CLAN");
        assert_eq!(value["heroes"].as_array().unwrap().len(), 2);
        assert!(value.get("troops").is_none());
        assert!(value.get("achievements").is_none());
    }

    #[test]
    fn test_player_summary_defaults_missing_fields() {
        let summary = summarize_player(&json!({}));
        assert_eq!(summary.name, "");
        assert_eq!(summary.trophies, 0);
        assert!(summary.clan.is_none());
        assert!(summary.heroes.is_empty());
    }

    #[test]
    fn test_clan_summary_fields_are_bounded() {
        let clan = json!({
            "tag": "#CLAN",
            "name": "The Order",
            "clanLevel": 20,
            "members": 48,
            "clanPoints": 52000,
            "requiredTrophies": 2600,
            "warWins": 310,
            "warWinStreak": 7,
            "warFrequency": "always",
            "warLeague": { "id": 48000015, "name": "Master League I" },
            "memberList": (0..48).map(|i| json!({"tag": format!("#M{i}")})).collect::<Vec<_>>(),
        });

        let value = serde_json::to_value(summarize_clan(&clan)).unwrap();
        assert_fields_within(&value, CLAN_FIELDS);
        assert_eq!(value["warLeague"], "Master League I");
        assert!(value.get("memberList").is_none());
    }

    #[test]
    fn test_war_summary_fields_are_bounded() {
        let war = json!({
            "state": "inWar",
            "teamSize": 15,
            "startTime": "20260801T080000.000Z",
            "endTime": "20260802T080000.000Z",
            "clan": {
                "tag": "#CLAN",
                "name": "The Order",
                "stars": 30,
                "destructionPercentage": 78.5,
                "attacks": 22,
                "members": (0..15).map(|i| json!({"tag": format!("#M{i}")})).collect::<Vec<_>>(),
            },
            "opponent": {
                "tag": "#FOE",
                "name": "Rivals",
                "stars": 27,
                "destructionPercentage": 71.0,
                "attacks": 25,
            },
        });

        let value = serde_json::to_value(summarize_war(&war)).unwrap();
        assert_fields_within(&value, WAR_FIELDS);
        assert_eq!(value["clan"]["stars"], 30);
        assert!(value["clan"].get("members").is_none());
    }

    #[test]
    fn test_war_summary_not_in_war_is_stable() {
        let expected = json!({ "state": "notInWar" });

        let explicit = summarize_war(&json!({ "state": "notInWar" }));
        assert_eq!(serde_json::to_value(&explicit).unwrap(), expected);

        let missing_state = summarize_war(&json!({}));
        assert_eq!(serde_json::to_value(&missing_state).unwrap(), expected);
    }

    #[test]
    fn test_summaries_do_not_mutate_input() {
        let player = big_player();
        let before = player.clone();
        let _ = summarize_player(&player);
        assert_eq!(player, before);
    }
}
