// tests/roster_extract.rs
use futbol_scrape::config::leagues::{LALIGA, LEAGUES};
use futbol_scrape::core::sanitize::canonical_team_id;
use futbol_scrape::data::PlayerRecord;
use futbol_scrape::merge::merge;
use futbol_scrape::specs::roster::extract;
use futbol_scrape::store::{load_team, save_team};

const SQUAD: &str = include_str!("fixtures/squad.html");

#[test]
fn j_doe_row() {
    let html = r#"<table class="items"><tbody><tr>
        <td>7</td><td><a href="/j-doe/profil/spieler/123-j-doe">J. Doe</a></td>
        <td>24</td><td></td><td>2026</td><td>€10m</td>
    </tr></tbody></table>"#;

    let players = extract(html);
    assert_eq!(players.len(), 1);
    let p = &players[0];
    assert_eq!(p.id, "123");
    assert_eq!(p.name, "J. Doe");
    assert_eq!(p.number, "7");
    assert_eq!(p.age, "24");
    assert_eq!(p.contract, "2026");
    assert_eq!(p.market_value, "€10m");
    assert!(p.nationalities.is_empty());
    assert_eq!(p.flag_url, None);

    let json = serde_json::to_value(merge(players).into_players()).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{
            "id": "123", "name": "J. Doe", "number": "7", "age": "24",
            "nationalities": [], "contract": "2026", "market_value": "€10m"
        }])
    );
}

#[test]
fn squad_fixture_extracts_and_merges_nested_rows() {
    let raw = extract(SQUAD);
    // every player row plus the first row of its inline name table
    assert_eq!(raw.len(), 6);

    let roster = merge(raw);
    assert_eq!(roster.len(), 3);

    let pena = roster.get("1").unwrap();
    assert_eq!(pena.name, "Iñaki Peña");
    assert_eq!(pena.number, "13");
    assert_eq!(pena.age, "02/03/1999 (26)");
    assert_eq!(pena.contract, "30/06/2026");
    assert_eq!(pena.market_value, "8,00 mill. €");
    assert_eq!(pena.nationalities, ["España"]);
    assert_eq!(
        pena.photo_url.as_deref(),
        Some("https://img.a.transfermarkt.technology/portrait/medium/1-1.jpg")
    );
    assert_eq!(
        pena.flag_url.as_deref(),
        Some("https://tmssl.akamaized.net/images/flagge/verysmall/157.png")
    );

    // the flag cell only contributes its first flag
    assert_eq!(roster.get("937958").unwrap().nationalities, ["España"]);

    let pedri = roster.get("683840").unwrap();
    assert_eq!(pedri.nationalities, ["España"]);
    assert_eq!(
        pedri.flag_url.as_deref(),
        Some("https://tmssl.akamaized.net/images/flagge/verysmall/157.png")
    );
}

#[test]
fn fixture_round_trips_through_store() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("barcelona.json");
    let n = save_team("FC Barcelona", extract(SQUAD), &path).unwrap();
    assert_eq!(n, 3);

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["team"], "FC Barcelona");
    assert_eq!(value["players"].as_array().unwrap().len(), 3);
    assert!(value["players"][0].get("href").is_none());

    let doc = load_team(&path).unwrap();
    assert_eq!(doc.players[1].name, "Lamine Yamal");
}

fn sample_records() -> Vec<PlayerRecord> {
    let mut a = PlayerRecord { id: "1".into(), name: "Ann".into(), ..Default::default() };
    a.nationalities = vec!["Spain".into()];
    let mut b = PlayerRecord { id: "1".into(), age: "20".into(), ..Default::default() };
    b.nationalities = vec!["Morocco".into(), "Spain".into()];
    let c = PlayerRecord { name: "No Id".into(), number: "4".into(), ..Default::default() };
    let d = PlayerRecord { name: "no  id".into(), contract: "2030".into(), ..Default::default() };
    vec![a, b, c, d]
}

#[test]
fn merge_is_idempotent() {
    let once = merge(sample_records());
    let twice = merge(once.clone().into_players());
    assert_eq!(once, twice);
    assert_eq!(once.len(), 2);
}

#[test]
fn merge_with_itself_changes_nothing() {
    let once = merge(sample_records());
    let doubled = merge(sample_records().into_iter().chain(sample_records()));
    assert_eq!(once, doubled);
}

#[test]
fn merge_fill_is_order_independent_for_disjoint_fields() {
    let x = PlayerRecord { id: "5".into(), name: "X".into(), age: "30".into(), ..Default::default() };
    let y = PlayerRecord {
        id: "5".into(),
        number: "9".into(),
        photo_url: Some("p.jpg".into()),
        nationalities: vec!["Brazil".into()],
        ..Default::default()
    };
    let xy = merge([x.clone(), y.clone()]).into_players();
    let yx = merge([y, x]).into_players();
    assert_eq!(xy, yx);
    assert_eq!(xy[0].number, "9");
    assert_eq!(xy[0].age, "30");
}

#[test]
fn canonical_ids_are_idempotent_everywhere() {
    let names = [
        "FC Barcelona", "Real Madrid CF", "Club Atlético de Madrid", "Deportivo Alavés",
        "UD Las Palmas", "RCD Mallorca", "Bayer 04 Leverkusen", "1.FC Heidenheim 1846",
        "Paris Saint-Germain FC", "Olympique de Marseille", "SSC Napoli", "Inter Milan",
        "Brighton & Hove Albion", "Nottingham Forest", "", "FC", "ß",
    ];
    for league in LEAGUES {
        for name in names {
            let once = canonical_team_id(name, league);
            assert_eq!(canonical_team_id(&once, league), once, "{name:?} in {}", league.key);
            assert!(once.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
    assert_eq!(canonical_team_id("Club Atlético de Madrid", &LALIGA), "club-atletico-de-madrid");
}
