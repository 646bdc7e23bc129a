//! Fixed data tables for the Permutation Engine: keyboard-adjacency maps,
//! homoglyph tables (Unicode and ASCII-only), per-TLD glyph overrides, and
//! the Cyrillic visual-confusable map. Embedded verbatim from the canonical
//! source, per spec §6/§9.

use std::collections::HashMap;

use lazy_static::lazy_static;

/// One keyboard-adjacency map: each key maps to a string of physically
/// neighboring characters.
pub type Keyboard = HashMap<char, &'static str>;

lazy_static! {
    pub static ref QWERTY: Keyboard = [
        ('1', "2q"), ('2', "3wq1"), ('3', "4ew2"), ('4', "5re3"), ('5', "6tr4"),
        ('6', "7yt5"), ('7', "8uy6"), ('8', "9iu7"), ('9', "0oi8"), ('0', "po9"),
        ('q', "12wa"), ('w', "3esaq2"), ('e', "4rdsw3"), ('r', "5tfde4"), ('t', "6ygfr5"),
        ('y', "7uhgt6"), ('u', "8ijhy7"), ('i', "9okju8"), ('o', "0plki9"), ('p', "lo0"),
        ('a', "qwsz"), ('s', "edxzaw"), ('d', "rfcxse"), ('f', "tgvcdr"), ('g', "yhbvft"),
        ('h', "ujnbgy"), ('j', "ikmnhu"), ('k', "olmji"), ('l', "kop"),
        ('z', "asx"), ('x', "zsdc"), ('c', "xdfv"), ('v', "cfgb"), ('b', "vghn"),
        ('n', "bhjm"), ('m', "njk"),
    ]
    .into_iter()
    .collect();

    pub static ref QWERTZ: Keyboard = [
        ('1', "2q"), ('2', "3wq1"), ('3', "4ew2"), ('4', "5re3"), ('5', "6tr4"),
        ('6', "7zt5"), ('7', "8uz6"), ('8', "9iu7"), ('9', "0oi8"), ('0', "po9"),
        ('q', "12wa"), ('w', "3esaq2"), ('e', "4rdsw3"), ('r', "5tfde4"), ('t', "6zgfr5"),
        ('z', "7uhgt6"), ('u', "8ijhz7"), ('i', "9okju8"), ('o', "0plki9"), ('p', "lo0"),
        ('a', "qwsy"), ('s', "edxyaw"), ('d', "rfcxse"), ('f', "tgvcdr"), ('g', "zhbvft"),
        ('h', "ujnbgz"), ('j', "ikmnhu"), ('k', "olmji"), ('l', "kop"),
        ('y', "asx"), ('x', "ysdc"), ('c', "xdfv"), ('v', "cfgb"), ('b', "vghn"),
        ('n', "bhjm"), ('m', "njk"),
    ]
    .into_iter()
    .collect();

    pub static ref AZERTY: Keyboard = [
        ('1', "2a"), ('2', "3za1"), ('3', "4ez2"), ('4', "5re3"), ('5', "6tr4"),
        ('6', "7yt5"), ('7', "8uy6"), ('8', "9iu7"), ('9', "0oi8"), ('0', "po9"),
        ('a', "2zq1"), ('z', "3esqa2"), ('e', "4rdsz3"), ('r', "5tfde4"), ('t', "6ygfr5"),
        ('y', "7uhgt6"), ('u', "8ijhy7"), ('i', "9okju8"), ('o', "0plki9"), ('p', "lo0m"),
        ('q', "zswa"), ('s', "edxwqz"), ('d', "rfcxse"), ('f', "tgvcdr"), ('g', "yhbvft"),
        ('h', "ujnbgy"), ('j', "iknhu"), ('k', "olji"), ('l', "kopm"), ('m', "lp"),
        ('w', "sxq"), ('x', "wsdc"), ('c', "xdfv"), ('v', "cfgb"), ('b', "vghn"), ('n', "bhj"),
    ]
    .into_iter()
    .collect();

    pub static ref KEYBOARDS: [&'static Keyboard; 3] = [&QWERTY, &QWERTZ, &AZERTY];

    /// Unicode homoglyph table: ASCII lowercase letters, digits `2 3 5 6 8 9`,
    /// and the digraphs `ae`/`oe`, each mapped to a list of visually
    /// confusable Unicode codepoints or short ASCII digraphs.
    pub static ref HOMOGLYPHS: HashMap<&'static str, Vec<&'static str>> = [
        ("a", vec!["à", "á", "â", "ã", "ä", "å", "ɑ", "ạ", "ǎ", "ă", "ȧ", "ą"]),
        ("b", vec!["d", "lb", "ʙ", "ɓ", "ḃ", "ḅ", "ḇ", "ƅ"]),
        ("c", vec!["e", "ƈ", "ċ", "ć", "ç", "č", "ĉ"]),
        ("d", vec!["b", "cl", "dl", "ɗ", "đ", "ď", "ɖ", "ḑ", "ḋ", "ḍ", "ḏ", "ḓ"]),
        ("e", vec!["c", "é", "è", "ê", "ë", "ē", "ĕ", "ě", "ė", "ẹ", "ę", "ȩ", "ɇ", "ḛ"]),
        ("f", vec!["ƒ", "ḟ"]),
        ("g", vec!["q", "ɢ", "ɡ", "ġ", "ğ", "ǵ", "ģ", "ĝ", "ǧ", "ǥ"]),
        ("h", vec!["lh", "ĥ", "ȟ", "ħ", "ɦ", "ḧ", "ḩ", "ⱨ", "ḣ", "ḥ", "ḫ", "ẖ"]),
        ("i", vec!["1", "l", "í", "ì", "ï", "ı", "ɩ", "ǐ", "ĭ", "ỉ", "ị", "ɨ", "ȋ", "ī"]),
        ("j", vec!["ʝ", "ɉ"]),
        ("k", vec!["lk", "ik", "lc", "ḳ", "ḵ", "ⱪ", "ķ"]),
        ("l", vec!["1", "i", "ɫ", "ł"]),
        ("m", vec!["n", "nn", "rn", "rr", "ṁ", "ṃ", "ᴍ", "ɱ", "ḿ"]),
        ("n", vec!["m", "r", "ń", "ṅ", "ṇ", "ṉ", "ñ", "ņ", "ǹ", "ň", "ꞑ"]),
        ("o", vec!["0", "ȯ", "ọ", "ỏ", "ơ", "ó", "ö"]),
        ("p", vec!["ƿ", "ƥ", "ṕ", "ṗ"]),
        ("q", vec!["g", "ʠ"]),
        ("r", vec!["ʀ", "ɼ", "ɽ", "ŕ", "ŗ", "ř", "ɍ", "ɾ", "ȓ", "ȑ", "ṙ", "ṛ", "ṟ"]),
        ("s", vec!["ʂ", "ś", "ṣ", "ṡ", "ș", "ŝ", "š"]),
        ("t", vec!["ţ", "ŧ", "ṫ", "ṭ", "ț", "ƫ"]),
        ("u", vec!["ᴜ", "ǔ", "ŭ", "ü", "ʉ", "ù", "ú", "û", "ũ", "ū", "ų", "ư", "ů", "ű", "ȕ", "ȗ", "ụ"]),
        ("v", vec!["ṿ", "ⱱ", "ᶌ", "ṽ", "ⱴ"]),
        ("w", vec!["vv", "ŵ", "ẁ", "ẃ", "ẅ", "ⱳ", "ẇ", "ẉ", "ẘ"]),
        ("y", vec!["ʏ", "ý", "ÿ", "ŷ", "ƴ", "ȳ", "ɏ", "ỿ", "ẏ", "ỵ"]),
        ("z", vec!["ʐ", "ż", "ź", "ᴢ", "ƶ", "ẓ", "ẕ", "ⱬ"]),
        ("2", vec!["ƨ", "ᒿ"]),
        ("3", vec!["ʒ", "Ʒ"]),
        ("5", vec!["ƽ"]),
        ("6", vec!["ь"]),
        ("8", vec!["ȣ"]),
        ("9", vec!["ƍ"]),
        ("ae", vec!["æ"]),
        ("oe", vec!["œ"]),
    ]
    .into_iter()
    .collect();

    /// ASCII-only multi-character confusables, a subset of `HOMOGLYPHS`
    /// restricted to entries that stay within `[a-z0-9-]` — used for
    /// registries that disallow IDN outright (see `TLD_OVERRIDES`).
    pub static ref ASCII_CONFUSABLES: HashMap<&'static str, Vec<&'static str>> = [
        ("b", vec!["d"]),
        ("d", vec!["b", "cl"]),
        ("g", vec!["q"]),
        ("i", vec!["1", "l"]),
        ("l", vec!["1", "i"]),
        ("m", vec!["n", "nn", "rn", "rr"]),
        ("n", vec!["m", "r"]),
        ("o", vec!["0"]),
        ("q", vec!["g"]),
        ("w", vec!["vv"]),
    ]
    .into_iter()
    .collect();

    /// Per-TLD overrides on the effective Unicode glyph table. `None` means
    /// "use the full `HOMOGLYPHS` table" (the default for an unknown TLD).
    /// `Some(map)` replaces the base table entirely for that TLD.
    pub static ref TLD_OVERRIDES: HashMap<&'static str, Option<HashMap<&'static str, Vec<&'static str>>>> = {
        let mut m: HashMap<&'static str, Option<HashMap<&'static str, Vec<&'static str>>>> = HashMap::new();
        // .info: Polish registry diacritics only.
        m.insert("info", Some(
            [
                ("a", vec!["ą"]),
                ("c", vec!["ć"]),
                ("e", vec!["ę"]),
                ("l", vec!["ł"]),
                ("n", vec!["ń"]),
                ("o", vec!["ó"]),
                ("s", vec!["ś"]),
                ("z", vec!["ź", "ż"]),
            ]
            .into_iter()
            .collect(),
        ));
        // .de: wide Latin-1 set, no exotic combining marks.
        m.insert("de", Some(
            [
                ("a", vec!["ä", "á", "à", "â"]),
                ("e", vec!["é", "è", "ê", "ë"]),
                ("o", vec!["ö", "ó", "ò", "ô"]),
                ("u", vec!["ü", "ú", "ù", "û"]),
                ("s", vec!["ß"]),
            ]
            .into_iter()
            .collect(),
        ));
        // These registries disallow IDN outright.
        for tld in ["jp", "cn", "uk", "us", "nl"] {
            m.insert(tld, Some(HashMap::new()));
        }
        m
    };

    pub static ref CYRILLIC: HashMap<char, char> = [
        ('a', 'а'), ('b', 'ь'), ('c', 'с'), ('d', 'ԁ'), ('e', 'е'), ('g', 'ԍ'),
        ('h', 'һ'), ('i', 'і'), ('j', 'ј'), ('k', 'к'), ('l', 'ӏ'), ('m', 'м'),
        ('n', 'ո'), ('o', 'о'), ('p', 'р'), ('q', 'ԛ'), ('r', 'г'), ('s', 'ѕ'),
        ('t', 'т'), ('u', 'ս'), ('v', 'ѵ'), ('w', 'ԝ'), ('x', 'х'), ('y', 'у'),
    ]
    .into_iter()
    .collect();
}

pub const VOWELS: &str = "aeiou";
