//! Select-option ordering for document and form pickers.
//!
//! Labels are compared at base strength: case and Latin diacritics are
//! ignored and ligatures such as `ß` expand to their base letters. The
//! locale decides which alphabet sorts first; Russian places Cyrillic ahead
//! of Latin, every other locale does the reverse.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Value marking the catch-all option that always sorts last.
pub const OTHER_VALUE: &str = "other";
/// Locale used when none is given.
pub const DEFAULT_LOCALE: &str = "ru";

/// Anything with a display label and a submitted value.
pub trait LabelledOption {
    fn label(&self) -> &str;
    fn value(&self) -> &str;
}

/// A plain label/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl LabelledOption for SelectOption {
    fn label(&self) -> &str {
        &self.label
    }

    fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScriptOrder {
    CyrillicFirst,
    LatinFirst,
}

/// Base-strength label comparison for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collation {
    order: ScriptOrder,
}

impl Default for Collation {
    fn default() -> Self {
        Self::for_locale(DEFAULT_LOCALE)
    }
}

impl Collation {
    /// Collation for a BCP 47 tag; only the primary language matters.
    pub fn for_locale(locale: &str) -> Self {
        let language = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let order = match language.as_str() {
            "ru" | "uk" | "be" | "bg" | "sr" | "kk" => ScriptOrder::CyrillicFirst,
            _ => ScriptOrder::LatinFirst,
        };
        Self { order }
    }

    /// Compare two labels, ignoring case and accents.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let left = fold(a).into_iter().map(|ch| self.weight(ch));
        let right = fold(b).into_iter().map(|ch| self.weight(ch));
        left.cmp(right)
    }

    fn weight(&self, ch: char) -> (u8, char) {
        let class = if ch.is_whitespace() || ch.is_ascii_punctuation() {
            0
        } else if ch.is_numeric() {
            1
        } else if is_cyrillic(ch) {
            match self.order {
                ScriptOrder::CyrillicFirst => 2,
                ScriptOrder::LatinFirst => 3,
            }
        } else if is_latin(ch) {
            match self.order {
                ScriptOrder::CyrillicFirst => 3,
                ScriptOrder::LatinFirst => 2,
            }
        } else {
            4
        };
        (class, ch)
    }
}

fn is_cyrillic(ch: char) -> bool {
    matches!(ch, '\u{0400}'..='\u{04FF}')
}

fn is_latin(ch: char) -> bool {
    ch.is_ascii_alphabetic()
        || (ch.is_alphabetic()
            && matches!(ch, '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}'))
}

fn is_combining_mark(ch: char) -> bool {
    matches!(ch, '\u{0300}'..='\u{036F}')
}

/// Lower-case `label` and reduce it to the letters base strength compares.
fn fold(label: &str) -> Vec<char> {
    let mut folded = Vec::with_capacity(label.len());
    for lower in label.chars().flat_map(char::to_lowercase) {
        if is_combining_mark(lower) {
            continue;
        }
        match base_letters(lower) {
            Some(base) => folded.extend(base.chars()),
            None => folded.push(lower),
        }
    }
    folded
}

/// Base letters of an accented or ligature lower-case letter.
fn base_letters(ch: char) -> Option<&'static str> {
    let base = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĳ' => "ij",
        'ĵ' => "j",
        'ķ' | 'ĸ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' | 'ŉ' | 'ŋ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' | 'ſ' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'ё' => "е",
        _ => return None,
    };
    Some(base)
}

/// Return a copy of `options` sorted by label, with every option whose
/// value equals `other_value` moved to the end. The sort is stable.
///
/// # Examples
/// ```
/// use portal_backend::domain::{Collation, OTHER_VALUE, SelectOption, sort_options};
///
/// let sorted = sort_options(
///     &[
///         SelectOption::new("Банк", "bank"),
///         SelectOption::new("Other", OTHER_VALUE),
///         SelectOption::new("авто", "car"),
///     ],
///     OTHER_VALUE,
///     Collation::default(),
/// );
/// let labels: Vec<&str> = sorted.iter().map(|option| option.label.as_str()).collect();
/// assert_eq!(labels, ["авто", "Банк", "Other"]);
/// ```
pub fn sort_options<T>(options: &[T], other_value: &str, collation: Collation) -> Vec<T>
where
    T: LabelledOption + Clone,
{
    let mut sorted = options.to_vec();
    sorted.sort_by(|a, b| {
        let a_other = a.value() == other_value;
        let b_other = b.value() == other_value;
        a_other
            .cmp(&b_other)
            .then_with(|| collation.compare(a.label(), b.label()))
    });
    sorted
}

/// Document types a leasing applicant can upload, as `(value, label)`.
pub const CLIENT_DOCUMENT_TYPES: [(&str, &str); 8] = [
    ("passport", "Паспорт"),
    ("emirates_id", "Emirates ID"),
    ("driving_license", "Водительское удостоверение"),
    ("visa", "Виза"),
    ("salary_certificate", "Справка о зарплате"),
    ("bank_statement", "Выписка из банка"),
    ("trade_license", "Торговая лицензия"),
    (OTHER_VALUE, "Другое"),
];

/// Applicant document picker in display order.
pub fn client_document_options(collation: Collation) -> Vec<SelectOption> {
    let options: Vec<SelectOption> = CLIENT_DOCUMENT_TYPES
        .iter()
        .map(|(value, label)| SelectOption::new(*label, *value))
        .collect();
    sort_options(&options, OTHER_VALUE, collation)
}
