// WHY: Static book table replaces per-call lookups into an external book list
// USFM numbering skips 40 so the New Testament starts at 41-MAT

use serde::Serialize;

/// Which source corpus a reference belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Testament {
    Old,
    New,
    Other,
}

/// One canonical book entry
#[derive(Debug, Clone, Copy)]
pub struct BookInfo {
    pub id: &'static str,
    pub usfm_number: u8,
    pub testament: Testament,
}

const fn old(id: &'static str, usfm_number: u8) -> BookInfo {
    BookInfo { id, usfm_number, testament: Testament::Old }
}

const fn new(id: &'static str, usfm_number: u8) -> BookInfo {
    BookInfo { id, usfm_number, testament: Testament::New }
}

pub const BOOKS: &[BookInfo] = &[
    old("GEN", 1), old("EXO", 2), old("LEV", 3), old("NUM", 4), old("DEU", 5),
    old("JOS", 6), old("JDG", 7), old("RUT", 8), old("1SA", 9), old("2SA", 10),
    old("1KI", 11), old("2KI", 12), old("1CH", 13), old("2CH", 14), old("EZR", 15),
    old("NEH", 16), old("EST", 17), old("JOB", 18), old("PSA", 19), old("PRO", 20),
    old("ECC", 21), old("SNG", 22), old("ISA", 23), old("JER", 24), old("LAM", 25),
    old("EZK", 26), old("DAN", 27), old("HOS", 28), old("JOL", 29), old("AMO", 30),
    old("OBA", 31), old("JON", 32), old("MIC", 33), old("NAM", 34), old("HAB", 35),
    old("ZEP", 36), old("HAG", 37), old("ZEC", 38), old("MAL", 39),
    new("MAT", 41), new("MRK", 42), new("LUK", 43), new("JHN", 44), new("ACT", 45),
    new("ROM", 46), new("1CO", 47), new("2CO", 48), new("GAL", 49), new("EPH", 50),
    new("PHP", 51), new("COL", 52), new("1TH", 53), new("2TH", 54), new("1TI", 55),
    new("2TI", 56), new("TIT", 57), new("PHM", 58), new("HEB", 59), new("JAS", 60),
    new("1PE", 61), new("2PE", 62), new("1JN", 63), new("2JN", 64), new("3JN", 65),
    new("JUD", 66), new("REV", 67),
];

/// Front and back matter: valid book ids with no original-language corpus
pub const EXTRA_BOOK_IDS: &[&str] = &["FRT", "BAK"];

/// Look up a canonical book by its (uppercase) USFM id
pub fn find_book(book_id: &str) -> Option<&'static BookInfo> {
    BOOKS.iter().find(|book| book.id == book_id)
}

pub fn is_valid_book_id(book_id: &str) -> bool {
    find_book(book_id).is_some() || EXTRA_BOOK_IDS.contains(&book_id)
}

/// Testament for a valid book id, `None` for unknown ids
pub fn testament(book_id: &str) -> Option<Testament> {
    match find_book(book_id) {
        Some(book) => Some(book.testament),
        None if EXTRA_BOOK_IDS.contains(&book_id) => Some(Testament::Other),
        None => None,
    }
}

/// File stem used by the original-language repos, e.g. `01-GEN`
pub fn usfm_number_name(book_id: &str) -> Option<String> {
    find_book(book_id).map(|book| format!("{:02}-{}", book.usfm_number, book.id))
}
