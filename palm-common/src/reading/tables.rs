//! Candidate fragments for reading assembly
//!
//! Order matters: draws index into these arrays, so reordering or editing an
//! entry changes the reading produced for every stored fingerprint.

pub const OVERALL_INTERPRETATIONS: [&str; 5] = [
    "Your palm reveals a soul destined for great things, with the wisdom to navigate life's complexities and the strength to achieve your dreams. The lines speak of a journey filled with meaningful connections and personal growth.",
    "The ancient art of palmistry shows a person of remarkable depth and potential. Your palm tells a story of someone who will touch many lives and leave a lasting positive impact on the world.",
    "Your hand carries the markings of someone blessed with both practical wisdom and spiritual insight. The lines suggest a life path that balances material success with emotional fulfillment.",
    "The mystical patterns in your palm indicate a person of great sensitivity and intuition. Your journey will be one of continuous learning and sharing your gifts with others.",
    "Your palm reveals the characteristics of a natural healer and guide. The lines suggest you have the ability to inspire others and help them find their own paths to happiness.",
];

pub const LIFE_LINE_STRENGTHS: [&str; 5] = ["Strong", "Moderate", "Delicate", "Bold", "Faint"];
pub const LIFE_LINE_LENGTHS: [&str; 5] = ["Long", "Medium", "Short", "Extended", "Curved"];
pub const LIFE_LINE_INTERPRETATIONS: [&str; 5] = [
    "Your life line suggests a vibrant and energetic approach to life, with strong vitality flowing through your years.",
    "This line indicates a balanced life path with steady energy and good health prospects.",
    "Your life line reveals a thoughtful, careful approach to life with attention to well-being.",
    "This formation suggests resilience and the ability to overcome challenges with grace.",
    "Your life line indicates a rich inner life and deep connection to your spiritual journey.",
];

pub const HEART_LINE_DEPTHS: [&str; 5] = ["Deep", "Moderate", "Light", "Pronounced", "Subtle"];
pub const HEART_LINE_CURVES: [&str; 5] = ["Curved", "Straight", "Wavy", "Arched", "Gentle"];
pub const HEART_LINE_INTERPRETATIONS: [&str; 5] = [
    "Your heart line reveals a passionate and emotionally rich nature, with deep capacity for love.",
    "This line suggests balanced emotions and the ability to form meaningful relationships.",
    "Your heart line indicates sensitivity and intuitive understanding of others' feelings.",
    "This formation shows loyalty and dedication in relationships, with strong emotional bonds.",
    "Your heart line reveals creativity and artistic sensibility in matters of the heart.",
];

pub const HEAD_LINE_CLARITIES: [&str; 5] = ["Clear", "Distinct", "Faint", "Bold", "Refined"];
pub const HEAD_LINE_DIRECTIONS: [&str; 5] = ["Straight", "Sloping", "Curved", "Angled", "Flowing"];
pub const HEAD_LINE_INTERPRETATIONS: [&str; 5] = [
    "Your head line indicates sharp analytical thinking and excellent problem-solving abilities.",
    "This line suggests creative intelligence and the ability to think outside conventional boundaries.",
    "Your head line reveals practical wisdom and grounded decision-making skills.",
    "This formation indicates intuitive intelligence and the ability to grasp complex concepts quickly.",
    "Your head line shows balanced thinking, combining logic with creative insight.",
];

pub const FATE_LINE_PRESENCES: [&str; 5] = ["Present", "Strong", "Faint", "Broken", "Multiple"];
pub const FATE_LINE_DIRECTIONS: [&str; 5] = ["Straight", "Curved", "Branched", "Wavy", "Ascending"];
pub const FATE_LINE_INTERPRETATIONS: [&str; 5] = [
    "Your fate line suggests a clear sense of purpose and direction in your career and life path.",
    "This line indicates adaptability and the ability to create your own destiny through choices.",
    "Your fate line reveals multiple talents and the potential for diverse career paths.",
    "This formation suggests independence and the strength to forge your own unique path.",
    "Your fate line indicates strong intuition about your life's purpose and calling.",
];

/// (name, meaning)
pub const SPECIAL_FEATURES: [(&str, &str); 10] = [
    ("Mount of Venus", "Enhanced capacity for love and artistic appreciation"),
    ("Mount of Jupiter", "Natural leadership abilities and ambition"),
    ("Mount of Saturn", "Wisdom, patience, and deep thinking"),
    ("Mount of Apollo", "Creative talents and potential for recognition"),
    ("Mount of Mercury", "Communication skills and business acumen"),
    ("Mount of Mars", "Courage, determination, and fighting spirit"),
    ("Mount of Luna", "Imagination, intuition, and psychic abilities"),
    ("Star Formation", "Exceptional talent or significant life event"),
    ("Triangle Pattern", "Intellectual gifts and analytical abilities"),
    ("Square Formation", "Protection and ability to overcome obstacles"),
];

pub const PERSONALITY_TRAITS: [&str; 20] = [
    "Intuitive",
    "Creative",
    "Analytical",
    "Compassionate",
    "Ambitious",
    "Artistic",
    "Practical",
    "Spiritual",
    "Independent",
    "Loyal",
    "Adventurous",
    "Wise",
    "Charismatic",
    "Determined",
    "Empathetic",
    "Innovative",
    "Reliable",
    "Passionate",
    "Thoughtful",
    "Resilient",
];

/// Special features drawn: `MIN + floor(draw * SPAN)`
pub const SPECIAL_FEATURE_COUNT_MIN: usize = 2;
pub const SPECIAL_FEATURE_COUNT_SPAN: usize = 3;

/// Personality traits drawn: `MIN + floor(draw * SPAN)`
pub const TRAIT_COUNT_MIN: usize = 5;
pub const TRAIT_COUNT_SPAN: usize = 5;
