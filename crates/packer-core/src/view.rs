use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use clap::ValueEnum;
use deunicode::deunicode;

use crate::item::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortMode {
    #[default]
    Input,
    Description,
    Packed,
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMode::Input => "input",
            SortMode::Description => "description",
            SortMode::Packed => "packed",
        };
        f.write_str(name)
    }
}

impl FromStr for SortMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "input" => Ok(SortMode::Input),
            "description" => Ok(SortMode::Description),
            "packed" => Ok(SortMode::Packed),
            other => Err(anyhow!("unknown sort mode: {other}")),
        }
    }
}

pub fn project(items: &[Item], mode: SortMode) -> Vec<&Item> {
    let mut view: Vec<&Item> = items.iter().collect();
    match mode {
        SortMode::Input => {}
        SortMode::Description => {
            view.sort_by(|a, b| collate(&a.description, &b.description));
        }
        SortMode::Packed => {
            view.sort_by_key(|item| item.packed);
        }
    }
    view
}

// Tiers: folded text, then accents, then case (lowercase first), then raw.
pub fn collate(a: &str, b: &str) -> Ordering {
    base_key(a)
        .cmp(&base_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

fn base_key(text: &str) -> Vec<(u8, char)> {
    deunicode(text)
        .to_lowercase()
        .chars()
        .map(|ch| {
            let class = if ch.is_alphabetic() {
                2
            } else if ch.is_numeric() {
                1
            } else {
                0
            };
            (class, ch)
        })
        .collect()
}

fn accent_key(text: &str) -> Vec<bool> {
    text.chars().map(|ch| !ch.is_ascii()).collect()
}

fn case_key(text: &str) -> Vec<bool> {
    text.chars().map(char::is_uppercase).collect()
}
