//! Synthetic record schemas and JSON corpus generation.
//!
//! Three flat schemas drawn from small fixed vocabularies. Records carry
//! sequential ids starting at 1 and are written once as a JSON array; nothing
//! is ever mutated after serialization.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;

const MOVIE_TITLES: &[&str] = &[
    "Silent Horizon",
    "Crimson Valley",
    "Echoes of Tomorrow",
    "Northbound",
    "Astra Drift",
    "Blue Lantern",
    "Midnight Harbor",
    "Glass River",
];
const MOVIE_GENRES: &[&str] = &["Drama", "Sci-Fi", "Thriller", "Comedy", "Adventure", "Mystery"];
const DIRECTORS: &[&str] = &[
    "Avery Quinn",
    "Morgan Ellis",
    "Riley Chen",
    "Harper Singh",
    "Jordan Blake",
    "Taylor Reyes",
];

const BOOK_TITLES: &[&str] = &[
    "The Last Orchard",
    "Paper Cities",
    "Sparks in Winter",
    "The River and the Road",
    "Atlas of Dust",
    "The Ninth Signal",
];
const BOOK_GENRES: &[&str] = &["Fantasy", "Historical", "Non-Fiction", "Mystery", "Romance", "Sci-Fi"];
const AUTHORS: &[&str] = &[
    "Samira Holt",
    "Eli Navarro",
    "Priya Kapoor",
    "Luca Moretti",
    "Noah Sterling",
    "Yuna Park",
];

const FIRST_NAMES: &[&str] = &[
    "Ava", "Liam", "Maya", "Ethan", "Isla", "Noah", "Zoe", "Amir", "Nora", "Leo",
];
const LAST_NAMES: &[&str] = &[
    "Johnson", "Khan", "Patel", "Garcia", "Nguyen", "Smith", "Rossi", "Wright",
];
const CITIES: &[&str] = &[
    "Austin", "Seattle", "Denver", "Toronto", "Dublin", "Oslo", "Berlin", "Lisbon",
];
const COUNTRIES: &[&str] = &["USA", "Canada", "Ireland", "Norway", "Germany", "Portugal"];

/// Which fixed schema a generation run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Movies,
    Books,
    People,
}

impl FromStr for RecordKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movies" => Ok(Self::Movies),
            "books" => Ok(Self::Books),
            "people" => Ok(Self::People),
            other => bail!("unknown type: {other} (expected movies, books, people)"),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Movies => "movies",
            Self::Books => "books",
            Self::People => "people",
        })
    }
}

#[derive(Debug, Serialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub genre: String,
    pub year: i32,
    pub director: String,
    pub rating: f64,
    #[serde(rename = "runtime_minutes")]
    pub runtime: u32,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    pub pages: u32,
    pub rating: f64,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct Person {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub city: String,
    pub country: String,
    pub age: u32,
    pub created_at: String,
}

pub fn make_movie<R: Rng>(rng: &mut R, id: u64, created_at: &str) -> Movie {
    Movie {
        id,
        title: pick(rng, MOVIE_TITLES),
        genre: pick(rng, MOVIE_GENRES),
        year: rng.gen_range(1980..2025),
        director: pick(rng, DIRECTORS),
        rating: rng.gen_range(5.5..9.8),
        runtime: rng.gen_range(80..161),
        created_at: created_at.to_owned(),
    }
}

pub fn make_book<R: Rng>(rng: &mut R, id: u64, created_at: &str) -> Book {
    Book {
        id,
        title: pick(rng, BOOK_TITLES),
        author: pick(rng, AUTHORS),
        genre: pick(rng, BOOK_GENRES),
        year: rng.gen_range(1965..2025),
        pages: rng.gen_range(150..600),
        rating: rng.gen_range(3.5..5.0),
        created_at: created_at.to_owned(),
    }
}

pub fn make_person<R: Rng>(rng: &mut R, id: u64, created_at: &str) -> Person {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let email = format!("{first}.{last}@example.com").to_lowercase();
    Person {
        id,
        first_name: first,
        last_name: last,
        email,
        city: pick(rng, CITIES),
        country: pick(rng, COUNTRIES),
        age: rng.gen_range(18..70),
        created_at: created_at.to_owned(),
    }
}

/// Writes `count` records as a JSON array, one record per line. Ids passed to
/// `make` are sequential starting at 1.
pub fn write_json_array<W: Write, T: Serialize>(
    writer: W,
    count: u64,
    mut make: impl FnMut(u64) -> T,
) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    writer.write_all(b"[\n")?;
    for i in 0..count {
        if i > 0 {
            writer.write_all(b",\n")?;
        }
        serde_json::to_writer(&mut writer, &make(i + 1))?;
    }
    writer.write_all(b"\n]\n")?;
    writer.flush()?;
    Ok(())
}

/// Generates `count` records of `kind` into the file at `path`.
pub fn generate_into<R: Rng>(path: &Path, kind: RecordKind, count: u64, rng: &mut R) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating output file {}", path.display()))?;
    let created_at = Utc::now().to_rfc3339();
    match kind {
        RecordKind::Movies => write_json_array(file, count, |id| make_movie(rng, id, &created_at)),
        RecordKind::Books => write_json_array(file, count, |id| make_book(rng, id, &created_at)),
        RecordKind::People => write_json_array(file, count, |id| make_person(rng, id, &created_at)),
    }
}

fn pick<R: Rng>(rng: &mut R, items: &[&str]) -> String {
    items[rng.gen_range(0..items.len())].to_owned()
}
