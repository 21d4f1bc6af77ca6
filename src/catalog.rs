//! Built-in shop catalogs and exam personas.
//!
//! These tables are compiled in and never mutated. Lookups that must always
//! produce something (the equipped theme or font) fall back to the first
//! catalog entry when the stored id is unknown.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::ExamGoal;

pub const DEFAULT_THEME_ID: &str = "default";
pub const DEFAULT_FONT_ID: &str = "patrick";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub bg: &'static str,
    pub card: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub palette: Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Font {
    pub id: &'static str,
    pub name: &'static str,
    pub family: &'static str,
    pub price: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerKind {
    Emoji,
    Icon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StickerCategory {
    Generic,
    Medical,
    Engineering,
    Arts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sticker {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: StickerKind,
    pub content: &'static str,
    pub price: u32,
    pub category: StickerCategory,
}

/// Defaults bundled with an exam goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Persona {
    pub goal: ExamGoal,
    pub title: &'static str,
    pub default_subjects: &'static [&'static str],
    pub quotes: &'static [&'static str],
    pub accent: &'static str,
    pub sticker_category: StickerCategory,
    pub default_theme_id: &'static str,
}

impl Persona {
    pub fn pick_quote<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.quotes.choose(rng).copied().unwrap_or("")
    }

    pub fn random_quote(&self) -> &'static str {
        self.pick_quote(&mut rand::thread_rng())
    }

    pub fn default_subjects(&self) -> Vec<String> {
        self.default_subjects.iter().map(|s| s.to_string()).collect()
    }
}

const fn palette(
    bg: &'static str,
    card: &'static str,
    accent: &'static str,
    text: &'static str,
) -> Palette {
    Palette {
        bg,
        card,
        accent,
        text,
    }
}

pub static THEMES: &[Theme] = &[
    Theme {
        id: DEFAULT_THEME_ID,
        name: "Classic Paper",
        price: 100,
        palette: palette("#FDFBF7", "#FFFFFF", "#EAB308", "#2D2D2D"),
    },
    Theme {
        id: "matcha",
        name: "Matcha",
        price: 150,
        palette: palette("#F1F8E9", "#FFFFFF", "#558B2F", "#1B5E20"),
    },
    Theme {
        id: "sakura",
        name: "Sakura",
        price: 150,
        palette: palette("#FFF0F5", "#FFD1DC", "#DB7093", "#880E4F"),
    },
    Theme {
        id: "midnight",
        name: "Midnight",
        price: 200,
        palette: palette("#0f172a", "#1e293b", "#60A5FA", "#F8FAFC"),
    },
    Theme {
        id: "vampire",
        name: "Vampire",
        price: 300,
        palette: palette("#210505", "#000000", "#B71C1C", "#FFCDD2"),
    },
    Theme {
        id: "lbsnaa_rust",
        name: "LBSNAA Rust",
        price: 250,
        palette: palette("#FDFBF7", "#F9F5EB", "#A52A2A", "#3d1a1a"),
    },
    Theme {
        id: "surgical_green",
        name: "Surgical Green",
        price: 250,
        palette: palette("#F0E9D8", "#FFFFFF", "#568A97", "#1a2e35"),
    },
    Theme {
        id: "blueprint_blue",
        name: "Blueprint",
        price: 250,
        palette: palette("#F8F9FA", "#FFFFFF", "#004C97", "#002147"),
    },
];

pub static FONTS: &[Font] = &[
    Font {
        id: DEFAULT_FONT_ID,
        name: "Patrick Hand",
        family: "\"Patrick Hand\", cursive",
        price: 50,
    },
    Font {
        id: "dancing",
        name: "Dancing Script",
        family: "\"Dancing Script\", cursive",
        price: 50,
    },
    Font {
        id: "caveat",
        name: "Caveat",
        family: "\"Caveat\", cursive",
        price: 60,
    },
    Font {
        id: "indie",
        name: "Indie Flower",
        family: "\"Indie Flower\", cursive",
        price: 70,
    },
    Font {
        id: "shadows",
        name: "Shadows Light",
        family: "\"Shadows Into Light\", cursive",
        price: 80,
    },
    Font {
        id: "courier",
        name: "Typewriter",
        family: "\"Courier Prime\", monospace",
        price: 120,
    },
];

const fn sticker(
    id: &'static str,
    name: &'static str,
    kind: StickerKind,
    content: &'static str,
    category: StickerCategory,
) -> Sticker {
    Sticker {
        id,
        name,
        kind,
        content,
        price: 50,
        category,
    }
}

use StickerCategory::{Arts, Engineering, Generic, Medical};
use StickerKind::{Emoji, Icon};

pub static STICKERS: &[Sticker] = &[
    sticker("stethoscope", "Stethoscope", Icon, "Stethoscope", Medical),
    sticker("heart", "Heart", Icon, "Heart", Medical),
    sticker("dna", "DNA", Icon, "Dna", Medical),
    sticker("pill", "Pill", Icon, "Pill", Medical),
    sticker("lungs", "Lungs", Emoji, "🫁", Medical),
    sticker("brain", "Brain", Icon, "Brain", Medical),
    sticker("syringe", "Syringe", Icon, "Syringe", Medical),
    sticker("labcoat", "Lab Coat", Emoji, "🥼", Medical),
    sticker("microscope", "Microscope", Icon, "Microscope", Medical),
    sticker("skeleton", "Skeleton", Icon, "Skull", Medical),
    sticker("bandage", "Bandage", Emoji, "🩹", Medical),
    sticker("ecg", "ECG", Icon, "Activity", Medical),
    sticker("ambulance", "Ambulance", Icon, "Ambulance", Medical),
    sticker("firstaid", "First Aid", Icon, "PlusSquare", Medical),
    sticker("tooth", "Tooth", Emoji, "🦷", Medical),
    sticker("gear", "Gear", Icon, "Settings", Engineering),
    sticker("rocket", "Rocket", Icon, "Rocket", Engineering),
    sticker("wrench", "Wrench", Icon, "Wrench", Engineering),
    sticker("ruler", "Ruler", Icon, "Ruler", Engineering),
    sticker("compass", "Compass", Icon, "Compass", Engineering),
    sticker("pi", "Pi", Icon, "Pi", Engineering),
    sticker("sigma", "Sigma", Icon, "Sigma", Engineering),
    sticker("infinity", "Infinity", Icon, "Infinity", Engineering),
    sticker("bulb", "Bulb", Icon, "Lightbulb", Engineering),
    sticker("laptop", "Laptop", Icon, "Laptop", Engineering),
    sticker("satellite", "Satellite", Emoji, "🛰️", Engineering),
    sticker("bridge", "Bridge", Emoji, "🌉", Engineering),
    sticker("atom", "Atom", Icon, "Atom", Engineering),
    sticker("calculator", "Calculator", Icon, "Calculator", Engineering),
    sticker("magnet", "Magnet", Icon, "Magnet", Engineering),
    sticker("pillar", "Ashoka Pillar", Icon, "Columns", Arts),
    sticker("indiagate", "India Gate", Icon, "Landmark", Arts),
    sticker("lalbatti", "Lal Batti", Icon, "Siren", Arts),
    sticker("pen", "Fountain Pen", Icon, "PenTool", Arts),
    sticker("specs", "Specs", Icon, "Glasses", Arts),
    sticker("const_book", "Constitution", Icon, "Book", Arts),
    sticker("scale", "Justice", Icon, "Scale", Arts),
    sticker("gavel", "Gavel", Icon, "Gavel", Arts),
    sticker("newspaper", "Newspaper", Icon, "Newspaper", Arts),
    sticker("globe", "Globe", Icon, "Globe", Arts),
    sticker("lotus", "Lotus", Emoji, "🪷", Arts),
    sticker("tiger", "Tiger", Emoji, "🐅", Arts),
    sticker("phone", "Old Phone", Icon, "Phone", Arts),
    sticker("briefcase", "Briefcase", Icon, "Briefcase", Arts),
    sticker("signature", "Signature", Icon, "Feather", Arts),
    sticker("star", "Gold Star", Emoji, "⭐", Generic),
    sticker("coffee", "Coffee", Emoji, "☕", Generic),
    sticker("sparkles", "Sparkles", Emoji, "✨", Generic),
    sticker("bolt", "Energy", Icon, "Zap", Generic),
    sticker("flame", "Streak", Icon, "Flame", Generic),
];

static NEET: Persona = Persona {
    goal: ExamGoal::Neet,
    title: "Dr.",
    default_subjects: &["Physics", "Chemistry", "Biology"],
    quotes: &[
        "The stethoscope is the only jewelry you need.",
        "Every chapter you finish saves a future life.",
        "Study like a patient's life depends on it.",
        "Medicines cure, doctors heal.",
        "White coat, heavy responsibility.",
        "Diagnosis: Hard work.",
        "Prescription: Success.",
        "Not just a student, a future healer.",
        "Biology is the study of you.",
        "Sleep is a luxury, Anatomy is a necessity.",
        "Trust me, I'm (almost) a Doctor.",
        "Emergency: Study Session in progress.",
        "From NCERT to MBBS.",
        "Pulse check: Still studying.",
        "Healing hands in the making.",
    ],
    accent: "#568A97",
    sticker_category: Medical,
    default_theme_id: "surgical_green",
};

static JEE: Persona = Persona {
    goal: ExamGoal::Jee,
    title: "Er.",
    default_subjects: &["Physics", "Chemistry", "Maths"],
    quotes: &[
        "Engineers turn dreams into reality.",
        "Everything is a number.",
        "Focus on the solution.",
        "Genius is 99% perspiration.",
        "If it isn't broken, fix it anyway.",
        "Physics is the poetry of the universe.",
        "Math is the language of God.",
        "Design. Build. Test. Repeat.",
        "Failure is just data gathering.",
        "I don't need sleep, I need answers.",
        "Pressure makes diamonds.",
        "Think like a proton, stay positive.",
        "Logic gets you from A to B.",
        "Imagination takes you everywhere.",
        "Building the future, one equation at a time.",
    ],
    accent: "#004C97",
    sticker_category: Engineering,
    default_theme_id: "blueprint_blue",
};

// No default subjects: UPSC aspirants enter their own optionals
static UPSC: Persona = Persona {
    goal: ExamGoal::Upsc,
    title: "Officer",
    default_subjects: &[],
    quotes: &[
        "Yogah Karmasu Kaushalam.",
        "Satyameva Jayate.",
        "Be the change you wish to see.",
        "Service before Self.",
        "The steel frame of India.",
        "Character is destiny.",
        "Read like a historian, think like a diplomat.",
        "Power is responsibility.",
        "Not for me, but for the country.",
        "The ink of the scholar is holy.",
        "Character is power.",
        "Excellence is not an act, but a habit.",
        "Jai Hind.",
        "Your signature will become an autograph.",
        "Policy is temporary, Nation is permanent.",
    ],
    accent: "#A52A2A",
    sticker_category: Arts,
    default_theme_id: "lbsnaa_rust",
};

static CUSTOM: Persona = Persona {
    goal: ExamGoal::Custom,
    title: "Student",
    default_subjects: &[],
    quotes: &[
        "Study hard, dream big.",
        "Knowledge is power.",
        "Focus on the process.",
        "One day at a time.",
    ],
    accent: "#EAB308",
    sticker_category: Generic,
    default_theme_id: DEFAULT_THEME_ID,
};

pub fn persona(goal: ExamGoal) -> &'static Persona {
    match goal {
        ExamGoal::Neet => &NEET,
        ExamGoal::Jee => &JEE,
        ExamGoal::Upsc => &UPSC,
        ExamGoal::Custom | ExamGoal::Unset => &CUSTOM,
    }
}

pub fn theme_by_id(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

pub fn font_by_id(id: &str) -> Option<&'static Font> {
    FONTS.iter().find(|f| f.id == id)
}

pub fn sticker_by_id(id: &str) -> Option<&'static Sticker> {
    STICKERS.iter().find(|s| s.id == id)
}

/// Equipped theme, or the first catalog theme when the id is unknown.
pub fn resolve_theme(id: &str) -> &'static Theme {
    theme_by_id(id).unwrap_or(&THEMES[0])
}

/// Equipped font, or the first catalog font when the id is unknown.
pub fn resolve_font(id: &str) -> &'static Font {
    font_by_id(id).unwrap_or(&FONTS[0])
}

/// Stickers the shop offers to a goal: generic ones plus the persona's own set.
pub fn stickers_for_goal(goal: ExamGoal) -> Vec<&'static Sticker> {
    let own = persona(goal).sticker_category;
    STICKERS
        .iter()
        .filter(|s| s.category == StickerCategory::Generic || s.category == own)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    mod lookup_tests {
        use super::*;

        #[test]
        fn ids_are_unique() {
            let themes: HashSet<_> = THEMES.iter().map(|t| t.id).collect();
            assert_eq!(themes.len(), THEMES.len());
            let fonts: HashSet<_> = FONTS.iter().map(|f| f.id).collect();
            assert_eq!(fonts.len(), FONTS.len());
            let stickers: HashSet<_> = STICKERS.iter().map(|s| s.id).collect();
            assert_eq!(stickers.len(), STICKERS.len());
        }

        #[test]
        fn defaults_are_first_entries() {
            assert_eq!(THEMES[0].id, DEFAULT_THEME_ID);
            assert_eq!(FONTS[0].id, DEFAULT_FONT_ID);
        }

        #[test]
        fn theme_by_id_finds_known() {
            let theme = theme_by_id("midnight").unwrap();
            assert_eq!(theme.name, "Midnight");
            assert_eq!(theme.price, 200);
        }

        #[test]
        fn resolve_falls_back_to_first() {
            assert_eq!(resolve_theme("no-such-theme").id, "default");
            assert_eq!(resolve_font("").id, "patrick");
            assert_eq!(resolve_font("courier").name, "Typewriter");
        }

        #[test]
        fn sticker_categories_have_fifteen_each() {
            let count = |c: StickerCategory| STICKERS.iter().filter(|s| s.category == c).count();
            assert_eq!(count(StickerCategory::Medical), 15);
            assert_eq!(count(StickerCategory::Engineering), 15);
            assert_eq!(count(StickerCategory::Arts), 15);
            assert_eq!(count(StickerCategory::Generic), 5);
        }

        #[test]
        fn goal_stickers_include_generic() {
            let neet = stickers_for_goal(ExamGoal::Neet);
            assert_eq!(neet.len(), 20);
            assert!(neet.iter().any(|s| s.id == "stethoscope"));
            assert!(neet.iter().any(|s| s.id == "star"));
            assert!(!neet.iter().any(|s| s.id == "gear"));

            assert_eq!(stickers_for_goal(ExamGoal::Custom).len(), 5);
        }
    }

    mod persona_tests {
        use super::*;

        #[test]
        fn persona_default_themes_exist() {
            for goal in [
                ExamGoal::Neet,
                ExamGoal::Jee,
                ExamGoal::Upsc,
                ExamGoal::Custom,
            ] {
                let p = persona(goal);
                assert!(theme_by_id(p.default_theme_id).is_some(), "{:?}", goal);
                assert!(!p.quotes.is_empty());
            }
        }

        #[test]
        fn unset_goal_uses_custom() {
            assert_eq!(persona(ExamGoal::Unset).goal, ExamGoal::Custom);
            assert_eq!(persona(ExamGoal::Unset).title, "Student");
        }

        #[test]
        fn titles_per_goal() {
            assert_eq!(persona(ExamGoal::Neet).title, "Dr.");
            assert_eq!(persona(ExamGoal::Jee).title, "Er.");
            assert_eq!(persona(ExamGoal::Upsc).title, "Officer");
        }

        #[test]
        fn pick_quote_comes_from_pool() {
            let mut rng = StdRng::seed_from_u64(7);
            let p = persona(ExamGoal::Jee);
            for _ in 0..20 {
                assert!(p.quotes.contains(&p.pick_quote(&mut rng)));
            }
        }
    }
}
