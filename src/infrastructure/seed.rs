//! Built-in cricket knowledge base used by `ragdesk ingest` when no file is given.

use crate::application::ingest::IngestRecord;

pub const CRICKET_SOURCE: &str = "cricket-knowledge-base";

const CRICKET: &[(&str, &str)] = &[
    (
        "Cricket World Cup 2023",
        "The 2023 Cricket World Cup was held in India from October to November 2023. India won the tournament, defeating Australia in the final at the Narendra Modi Stadium in Ahmedabad. Virat Kohli was the tournament's leading run-scorer with 765 runs.",
    ),
    (
        "T20 Cricket Format",
        "Twenty20 (T20) is the shortest format of cricket, lasting about 3 hours. Each team plays a single innings, batting for a maximum of 20 overs. T20 cricket was first introduced in England in 2003 and has become immensely popular worldwide.",
    ),
    (
        "Test Cricket",
        "Test cricket is the longest format of the game, played over five days with two innings per side. It is considered the pinnacle of cricket and tests the endurance, skill, and strategy of players. The first Test match was played between Australia and England in 1877.",
    ),
    (
        "IPL - Indian Premier League",
        "The Indian Premier League (IPL) is a professional Twenty20 cricket league in India. Founded in 2008, it features franchise teams representing different cities. The IPL has become one of the richest and most-watched cricket leagues in the world.",
    ),
    (
        "Cricket Rules - Basics",
        "Cricket is played between two teams of 11 players each. The batting team tries to score runs by hitting the ball and running between wickets. The bowling team tries to dismiss batters and restrict runs. A match is won by the team that scores more runs.",
    ),
    (
        "Cricket Equipment",
        "Essential cricket equipment includes a bat (made of willow wood), a leather ball (red for Tests, white for limited-overs), stumps and bails, protective gear like pads, gloves, helmet, and appropriate cricket shoes with spikes.",
    ),
    (
        "Famous Cricket Players",
        "Some of the greatest cricket players include Sachin Tendulkar (India), Sir Donald Bradman (Australia), Virat Kohli (India), Steve Smith (Australia), and AB de Villiers (South Africa). These players have set numerous records and inspired millions.",
    ),
    (
        "Cricket Scoring",
        "Runs can be scored by hitting the ball and running between wickets (1, 2, or 3 runs), hitting boundaries (4 runs if the ball touches the ground before crossing the boundary, 6 runs if it crosses the boundary without touching the ground).",
    ),
    (
        "ODI Cricket",
        "One Day International (ODI) cricket is a limited-overs format where each team plays 50 overs. The first ODI was played in 1971. The ICC Cricket World Cup, held every four years, is played in the ODI format and is one of the most prestigious tournaments.",
    ),
    (
        "Cricket Fielding Positions",
        "Cricket has numerous fielding positions including slip, gully, point, cover, mid-off, mid-on, mid-wicket, square leg, fine leg, and third man. The captain strategically places fielders based on the batsman's style and match situation.",
    ),
];

pub fn cricket_knowledge_base() -> Vec<IngestRecord> {
    CRICKET
        .iter()
        .map(|(title, content)| IngestRecord {
            title: title.to_string(),
            content: content.to_string(),
        })
        .collect()
}
