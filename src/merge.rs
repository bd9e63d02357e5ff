// src/merge.rs
//
// Dedup by identity. The first record seen for an identity keeps its place and
// its values; later duplicates only fill fields it left empty, and contribute
// nationalities it does not have yet.

use std::collections::HashMap;

use crate::data::PlayerRecord;

/// Insertion-ordered identity → record map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<PlayerRecord>,
    index: HashMap<String, usize>,
}

impl Roster {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, mut rec: PlayerRecord) {
        let key = rec.identity();
        match self.index.get(&key) {
            Some(&i) => absorb(&mut self.players[i], rec),
            None => {
                let nats = std::mem::take(&mut rec.nationalities);
                union_into(&mut rec.nationalities, nats);
                self.index.insert(key, self.players.len());
                self.players.push(rec);
            }
        }
    }

    pub fn get(&self, identity: &str) -> Option<&PlayerRecord> {
        self.index.get(identity).map(|&i| &self.players[i])
    }

    pub fn len(&self) -> usize { self.players.len() }

    pub fn is_empty(&self) -> bool { self.players.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.iter()
    }

    pub fn into_players(self) -> Vec<PlayerRecord> { self.players }
}

impl FromIterator<PlayerRecord> for Roster {
    fn from_iter<I: IntoIterator<Item = PlayerRecord>>(iter: I) -> Self {
        let mut r = Roster::new();
        for rec in iter {
            r.insert(rec);
        }
        r
    }
}

pub fn merge<I: IntoIterator<Item = PlayerRecord>>(records: I) -> Roster {
    records.into_iter().collect()
}

fn fill(dst: &mut String, src: String) {
    if dst.is_empty() && !src.is_empty() {
        *dst = src;
    }
}

fn fill_opt(dst: &mut Option<String>, src: Option<String>) {
    if dst.is_none() {
        *dst = src;
    }
}

fn union_into(dst: &mut Vec<String>, src: Vec<String>) {
    for n in src {
        if !n.is_empty() && !dst.contains(&n) {
            dst.push(n);
        }
    }
}

fn absorb(existing: &mut PlayerRecord, incoming: PlayerRecord) {
    let PlayerRecord {
        id, name, number, age, nationalities, contract, market_value, flag_url, photo_url, href,
    } = incoming;
    fill(&mut existing.id, id);
    fill(&mut existing.name, name);
    fill(&mut existing.number, number);
    fill(&mut existing.age, age);
    fill(&mut existing.contract, contract);
    fill(&mut existing.market_value, market_value);
    fill(&mut existing.href, href);
    fill_opt(&mut existing.flag_url, flag_url);
    fill_opt(&mut existing.photo_url, photo_url);
    union_into(&mut existing.nationalities, nationalities);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, name: &str) -> PlayerRecord {
        PlayerRecord { id: s!(id), name: s!(name), ..Default::default() }
    }

    #[test]
    fn existing_wins_unless_empty() {
        let mut a = rec("9", "Ann");
        a.age = s!("21");
        let mut b = rec("9", "Other");
        b.age = s!("30");
        b.number = s!("7");
        b.photo_url = Some(s!("p.png"));

        let r = merge([a, b]);
        assert_eq!(r.len(), 1);
        let p = r.get("9").unwrap();
        assert_eq!(p.name, "Ann");
        assert_eq!(p.age, "21");
        assert_eq!(p.number, "7");
        assert_eq!(p.photo_url.as_deref(), Some("p.png"));
    }

    #[test]
    fn nationalities_union_in_first_seen_order() {
        let mut a = rec("1", "A");
        a.nationalities = vec![s!("Spain"), s!(""), s!("Spain")];
        let mut b = rec("1", "A");
        b.nationalities = vec![s!("Morocco"), s!("Spain"), s!("")];
        let r = merge([a, b]);
        assert_eq!(r.get("1").unwrap().nationalities, ["Spain", "Morocco"]);
    }

    #[test]
    fn id_less_rows_merge_by_name_key() {
        let r = merge([rec("", "J. Doe"), rec("", "j.  doe")]);
        assert_eq!(r.len(), 1);
        assert!(r.get("j._doe").is_some());
    }

    #[test]
    fn keeps_first_seen_order() {
        let r = merge([rec("3", "C"), rec("1", "A"), rec("3", "C"), rec("2", "B")]);
        let ids: Vec<_> = r.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }
}
