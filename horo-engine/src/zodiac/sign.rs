//! The twelve signs and their static attributes
//!
//! All sign data is compile-time: `Sign` is a closed enum and every attribute
//! is read from [`SIGN_TABLE`], indexed by the enum discriminant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Zodiac sign (calendar-interval classification)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Classical element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

/// Modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Cardinal,
    Fixed,
    Mutable,
}

/// Month/day pair, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

const fn md(month: u32, day: u32) -> MonthDay {
    MonthDay { month, day }
}

/// Static attributes of one sign
#[derive(Debug)]
pub struct SignData {
    pub id: &'static str,
    pub display_name: &'static str,
    pub symbol: &'static str,
    pub element: Element,
    pub quality: Quality,
    pub ruling_planet: &'static str,
    pub start: MonthDay,
    pub end: MonthDay,
    pub lucky_numbers: &'static [u32],
    pub lucky_colors: &'static [&'static str],
    pub compatible: &'static [Sign],
    pub strengths: &'static [&'static str],
    pub challenges: &'static [&'static str],
}

use Sign::*;

pub static SIGN_TABLE: [SignData; 12] = [
    SignData {
        id: "aries",
        display_name: "Aries",
        symbol: "♈",
        element: Element::Fire,
        quality: Quality::Cardinal,
        ruling_planet: "Mars",
        start: md(3, 21),
        end: md(4, 19),
        lucky_numbers: &[1, 8, 17],
        lucky_colors: &["Red", "Scarlet"],
        compatible: &[Leo, Sagittarius, Gemini],
        strengths: &["Energetic", "Independent", "Courageous", "Leadership"],
        challenges: &["Impatient", "Impulsive", "Short-tempered"],
    },
    SignData {
        id: "taurus",
        display_name: "Taurus",
        symbol: "♉",
        element: Element::Earth,
        quality: Quality::Fixed,
        ruling_planet: "Venus",
        start: md(4, 20),
        end: md(5, 20),
        lucky_numbers: &[2, 6, 9, 12, 24],
        lucky_colors: &["Green", "Pink"],
        compatible: &[Virgo, Capricorn, Cancer],
        strengths: &["Reliable", "Patient", "Practical", "Devoted"],
        challenges: &["Stubborn", "Possessive", "Uncompromising"],
    },
    SignData {
        id: "gemini",
        display_name: "Gemini",
        symbol: "♊",
        element: Element::Air,
        quality: Quality::Mutable,
        ruling_planet: "Mercury",
        start: md(5, 21),
        end: md(6, 20),
        lucky_numbers: &[5, 7, 14, 23],
        lucky_colors: &["Yellow", "Light Green"],
        compatible: &[Libra, Aquarius, Aries],
        strengths: &["Adaptable", "Curious", "Quick-witted", "Communicative"],
        challenges: &["Inconsistent", "Indecisive", "Nervous"],
    },
    SignData {
        id: "cancer",
        display_name: "Cancer",
        symbol: "♋",
        element: Element::Water,
        quality: Quality::Cardinal,
        ruling_planet: "Moon",
        start: md(6, 21),
        end: md(7, 22),
        lucky_numbers: &[2, 7, 11, 16, 20, 25],
        lucky_colors: &["White", "Silver"],
        compatible: &[Scorpio, Pisces, Taurus],
        strengths: &["Intuitive", "Emotional", "Protective", "Sympathetic"],
        challenges: &["Moody", "Clingy", "Oversensitive"],
    },
    SignData {
        id: "leo",
        display_name: "Leo",
        symbol: "♌",
        element: Element::Fire,
        quality: Quality::Fixed,
        ruling_planet: "Sun",
        start: md(7, 23),
        end: md(8, 22),
        lucky_numbers: &[1, 3, 10, 19],
        lucky_colors: &["Gold", "Orange"],
        compatible: &[Aries, Sagittarius, Libra],
        strengths: &["Confident", "Generous", "Creative", "Warm-hearted"],
        challenges: &["Arrogant", "Stubborn", "Self-centered"],
    },
    SignData {
        id: "virgo",
        display_name: "Virgo",
        symbol: "♍",
        element: Element::Earth,
        quality: Quality::Mutable,
        ruling_planet: "Mercury",
        start: md(8, 23),
        end: md(9, 22),
        lucky_numbers: &[5, 14, 15, 23, 32],
        lucky_colors: &["Grey", "Beige"],
        compatible: &[Taurus, Capricorn, Scorpio],
        strengths: &["Analytical", "Practical", "Reliable", "Modest"],
        challenges: &["Overly critical", "Worry-prone", "Perfectionist"],
    },
    SignData {
        id: "libra",
        display_name: "Libra",
        symbol: "♎",
        element: Element::Air,
        quality: Quality::Cardinal,
        ruling_planet: "Venus",
        start: md(9, 23),
        end: md(10, 22),
        lucky_numbers: &[4, 6, 13, 15, 24],
        lucky_colors: &["Pink", "Light Blue"],
        compatible: &[Gemini, Aquarius, Leo],
        strengths: &["Diplomatic", "Fair-minded", "Social", "Idealistic"],
        challenges: &["Indecisive", "Avoids confrontation", "Self-pity"],
    },
    SignData {
        id: "scorpio",
        display_name: "Scorpio",
        symbol: "♏",
        element: Element::Water,
        quality: Quality::Fixed,
        ruling_planet: "Mars/Pluto",
        start: md(10, 23),
        end: md(11, 21),
        lucky_numbers: &[8, 11, 18, 22],
        lucky_colors: &["Maroon", "Black"],
        compatible: &[Cancer, Pisces, Virgo],
        strengths: &["Passionate", "Determined", "Brave", "Loyal"],
        challenges: &["Jealous", "Secretive", "Resentful"],
    },
    SignData {
        id: "sagittarius",
        display_name: "Sagittarius",
        symbol: "♐",
        element: Element::Fire,
        quality: Quality::Mutable,
        ruling_planet: "Jupiter",
        start: md(11, 22),
        end: md(12, 21),
        lucky_numbers: &[3, 7, 9, 12, 21],
        lucky_colors: &["Purple", "Blue"],
        compatible: &[Aries, Leo, Aquarius],
        strengths: &["Optimistic", "Freedom-loving", "Honest", "Intellectual"],
        challenges: &["Impatient", "Promises more than can deliver", "Tactless"],
    },
    SignData {
        id: "capricorn",
        display_name: "Capricorn",
        symbol: "♑",
        element: Element::Earth,
        quality: Quality::Cardinal,
        ruling_planet: "Saturn",
        start: md(12, 22),
        end: md(1, 19),
        lucky_numbers: &[4, 8, 13, 22],
        lucky_colors: &["Brown", "Dark Green"],
        compatible: &[Taurus, Virgo, Pisces],
        strengths: &["Ambitious", "Disciplined", "Patient", "Responsible"],
        challenges: &["Know-it-all", "Unforgiving", "Condescending"],
    },
    SignData {
        id: "aquarius",
        display_name: "Aquarius",
        symbol: "♒",
        element: Element::Air,
        quality: Quality::Fixed,
        ruling_planet: "Saturn/Uranus",
        start: md(1, 20),
        end: md(2, 18),
        lucky_numbers: &[4, 7, 11, 22, 29],
        lucky_colors: &["Turquoise", "Electric Blue"],
        compatible: &[Gemini, Libra, Sagittarius],
        strengths: &["Independent", "Humanitarian", "Original", "Intellectual"],
        challenges: &["Runs from emotion", "Temperamental", "Uncompromising"],
    },
    SignData {
        id: "pisces",
        display_name: "Pisces",
        symbol: "♓",
        element: Element::Water,
        quality: Quality::Mutable,
        ruling_planet: "Jupiter/Neptune",
        start: md(2, 19),
        end: md(3, 20),
        lucky_numbers: &[3, 9, 12, 15, 18, 24],
        lucky_colors: &["Sea Green", "Lavender"],
        compatible: &[Cancer, Scorpio, Capricorn],
        strengths: &["Compassionate", "Artistic", "Intuitive", "Gentle"],
        challenges: &["Fearful", "Overly trusting", "Sad", "Desire to escape"],
    },
];

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

impl Sign {
    /// All signs in zodiac order, starting at Aries
    pub const ALL: [Sign; 12] = [
        Aries,
        Taurus,
        Gemini,
        Cancer,
        Leo,
        Virgo,
        Libra,
        Scorpio,
        Sagittarius,
        Capricorn,
        Aquarius,
        Pisces,
    ];

    pub fn data(self) -> &'static SignData {
        &SIGN_TABLE[self as usize]
    }

    /// Lowercase identifier used in keys and content documents
    pub fn id(self) -> &'static str {
        self.data().id
    }

    pub fn display_name(self) -> &'static str {
        self.data().display_name
    }

    pub fn symbol(self) -> &'static str {
        self.data().symbol
    }

    pub fn element(self) -> Element {
        self.data().element
    }

    pub fn quality(self) -> Quality {
        self.data().quality
    }

    pub fn ruling_planet(self) -> &'static str {
        self.data().ruling_planet
    }

    pub fn lucky_numbers(self) -> &'static [u32] {
        self.data().lucky_numbers
    }

    pub fn lucky_colors(self) -> &'static [&'static str] {
        self.data().lucky_colors
    }

    pub fn compatible_signs(self) -> &'static [Sign] {
        self.data().compatible
    }

    /// Whether the interval crosses the new year (Capricorn)
    pub fn wraps_year(self) -> bool {
        let data = self.data();
        data.start.month > data.end.month
    }

    /// Human readable interval, e.g. "March 21 - April 19"
    pub fn date_range(self) -> String {
        let data = self.data();
        format!(
            "{} {} - {} {}",
            MONTH_NAMES[(data.start.month - 1) as usize],
            data.start.day,
            MONTH_NAMES[(data.end.month - 1) as usize],
            data.end.day
        )
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Sign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Sign::ALL
            .iter()
            .copied()
            .find(|sign| sign.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown zodiac sign '{}'", s))
    }
}

impl Element {
    pub fn display_name(self) -> &'static str {
        match self {
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Air => "Air",
            Element::Water => "Water",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Quality {
    pub fn display_name(self) -> &'static str {
        match self {
            Quality::Cardinal => "Cardinal",
            Quality::Fixed => "Fixed",
            Quality::Mutable => "Mutable",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
