//! The Permutation Engine (spec §4.2): from a `DomainTriple`, apply every
//! enabled fuzzer to the registrable label, reattach subdomain/TLD,
//! normalize to Punycode, validate as FQDN, and dedupe.

pub mod algorithms;
pub mod data;

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::idna_util;
use crate::model::Permutation;
use crate::parser::DomainTriple;

pub const ALL_FUZZERS: &[&str] = &[
    "bitsquatting",
    "homoglyph",
    "hyphenation",
    "insertion",
    "omission",
    "repetition",
    "replacement",
    "subdomain",
    "transposition",
    "vowel-swap",
    "addition",
    "plural",
    "cyrillic",
    "dictionary",
    "tld-swap",
    "various",
];

pub struct Engine<'a> {
    triple: DomainTriple,
    dictionary: &'a [String],
    tld_dictionary: &'a HashSet<String>,
    fuzzers: Option<&'a HashSet<String>>,
}

impl<'a> Engine<'a> {
    pub fn new(
        triple: DomainTriple,
        dictionary: &'a [String],
        tld_dictionary: &'a HashSet<String>,
        fuzzers: Option<&'a HashSet<String>>,
    ) -> Self {
        Engine {
            triple,
            dictionary,
            tld_dictionary,
            fuzzers,
        }
    }

    fn enabled(&self, name: &str) -> bool {
        self.fuzzers.map(|set| set.contains(name)).unwrap_or(true)
    }

    /// Resolve the effective homoglyph table for this triple's TLD: the
    /// per-TLD override when one exists, else the full Unicode table.
    fn effective_glyph_table(&self) -> &'static HashMap<&'static str, Vec<&'static str>> {
        match data::TLD_OVERRIDES.get(self.triple.tld.as_str()) {
            Some(Some(override_table)) => {
                // Leak-free: override tables are 'static by construction in
                // data.rs, but stored behind a lazy_static HashMap keyed by
                // &'static str, so this reference is itself 'static.
                override_table
            }
            _ => algorithms::full_homoglyph_table(),
        }
    }

    pub fn generate(&self) -> Vec<Permutation> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::new();

        let original_fqdn = self.triple.join(None, None);
        self.push(&mut out, &mut seen, "*original", &original_fqdn);

        if self.enabled("addition") {
            for label in algorithms::addition(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "addition", &label);
            }
        }
        if self.enabled("bitsquatting") {
            for label in algorithms::bitsquatting(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "bitsquatting", &label);
            }
        }
        if self.enabled("homoglyph") {
            let glyphs = self.effective_glyph_table();
            for label in algorithms::homoglyph(&self.triple.label, glyphs) {
                self.push_label(&mut out, &mut seen, "homoglyph", &label);
            }
        }
        if self.enabled("hyphenation") {
            for label in algorithms::hyphenation(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "hyphenation", &label);
            }
        }
        if self.enabled("insertion") {
            for label in algorithms::insertion(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "insertion", &label);
            }
        }
        if self.enabled("omission") {
            for label in algorithms::omission(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "omission", &label);
            }
        }
        if self.enabled("repetition") {
            for label in algorithms::repetition(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "repetition", &label);
            }
        }
        if self.enabled("replacement") {
            for label in algorithms::replacement(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "replacement", &label);
            }
        }
        if self.enabled("subdomain") {
            for label in algorithms::subdomain(&self.triple.label) {
                // `subdomain` varies the label/subdomain split itself: the
                // dot-inserted string becomes `newsub.label` joined with
                // the triple's existing subdomain and TLD.
                let fqdn = join_with_subdomain(&self.triple, &label);
                self.push(&mut out, &mut seen, "subdomain", &fqdn);
            }
        }
        if self.enabled("transposition") {
            for label in algorithms::transposition(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "transposition", &label);
            }
        }
        if self.enabled("vowel-swap") {
            for label in algorithms::vowel_swap(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "vowel-swap", &label);
            }
        }
        if self.enabled("plural") {
            for label in algorithms::plural(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "plural", &label);
            }
        }
        if self.enabled("cyrillic") {
            for label in algorithms::cyrillic(&self.triple.label) {
                self.push_label(&mut out, &mut seen, "cyrillic", &label);
            }
        }
        if self.enabled("dictionary") {
            for label in algorithms::dictionary(&self.triple.label, self.dictionary) {
                self.push_label(&mut out, &mut seen, "dictionary", &label);
            }
        }
        if self.enabled("tld-swap") {
            for tld in self.tld_dictionary.iter().filter(|t| *t != &self.triple.tld) {
                let fqdn = self.triple.join(None, Some(tld));
                self.push(&mut out, &mut seen, "tld-swap", &fqdn);
            }
        }
        if self.enabled("various") {
            for fqdn in self.various_variants() {
                self.push(&mut out, &mut seen, "various", &fqdn);
            }
        }

        debug!(
            "engine generated {} unique permutations for {}",
            out.len(),
            original_fqdn
        );
        out
    }

    /// Structural variants of spec §4.2's `various` fuzzer.
    fn various_variants(&self) -> Vec<String> {
        let t = &self.triple;
        let mut variants = Vec::new();
        if t.tld.contains('.') {
            let last = t.tld.rsplit('.').next().unwrap_or(&t.tld);
            variants.push(format!("{}.{}", t.label, last));
            variants.push(format!("{}{}", t.label, t.tld));
        } else {
            variants.push(format!("{}{}.{}", t.label, t.tld, t.tld));
            if t.tld != "com" {
                variants.push(format!("{}-{}.com", t.label, t.tld));
                variants.push(format!("{}{}.com", t.label, t.tld));
            }
        }
        if !t.subdomain.is_empty() {
            variants.push(format!("{}{}.{}", t.subdomain, t.label, t.tld));
            variants.push(format!("{}-{}.{}", t.subdomain, t.label, t.tld));
        }
        variants
    }

    fn push_label(&self, out: &mut Vec<Permutation>, seen: &mut HashSet<String>, fuzzer: &str, label: &str) {
        let fqdn = self.triple.join(Some(label), None);
        self.push(out, seen, fuzzer, &fqdn);
    }

    fn push(&self, out: &mut Vec<Permutation>, seen: &mut HashSet<String>, fuzzer: &str, fqdn: &str) {
        if let Some(encoded) = idna_util::normalize_and_validate(fqdn) {
            if seen.insert(encoded.clone()) {
                out.push(Permutation::new(fuzzer, encoded));
            }
        }
    }
}

fn join_with_subdomain(triple: &DomainTriple, dotted_label: &str) -> String {
    let mut segments = Vec::new();
    if !triple.subdomain.is_empty() {
        segments.push(triple.subdomain.as_str());
    }
    segments.push(dotted_label);
    segments.push(triple.tld.as_str());
    segments.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_for<'a>(
        domain: &str,
        dict: &'a [String],
        tld_dict: &'a HashSet<String>,
        fuzzers: Option<&'a HashSet<String>>,
    ) -> Engine<'a> {
        let triple = DomainTriple::split(domain, None);
        Engine::new(triple, dict, tld_dict, fuzzers)
    }

    fn only(name: &str) -> HashSet<String> {
        [name.to_string()].into_iter().collect()
    }

    #[test]
    fn omission_scenario_matches_spec_example() {
        let dict = vec![];
        let tld_dict = HashSet::new();
        let fuzzers = only("omission");
        let engine = engine_for("example.com", &dict, &tld_dict, Some(&fuzzers));
        let out: HashSet<String> = engine.generate().into_iter().map(|p| p.domain).collect();
        for expect in [
            "xample.com",
            "eample.com",
            "exmple.com",
            "exaple.com",
            "examle.com",
            "exampe.com",
            "exampl.com",
        ] {
            assert!(out.contains(expect), "missing {}", expect);
        }
    }

    #[test]
    fn homoglyph_scenario_contains_cyrillic_a_substitution() {
        let dict = vec![];
        let tld_dict = HashSet::new();
        let fuzzers = only("homoglyph");
        let engine = engine_for("paypal.com", &dict, &tld_dict, Some(&fuzzers));
        let out: Vec<Permutation> = engine.generate();
        assert!(out.iter().any(|p| p.domain.starts_with("xn--")));
        for p in &out {
            assert!(idna_util::is_valid_fqdn(&p.domain));
        }
    }

    #[test]
    fn no_duplicate_domains_emitted() {
        let dict = vec![];
        let tld_dict = HashSet::new();
        let engine = engine_for("example.com", &dict, &tld_dict, None);
        let out = engine.generate();
        let mut seen = HashSet::new();
        for p in &out {
            assert!(seen.insert(p.domain.clone()), "duplicate {}", p.domain);
        }
    }

    #[test]
    fn original_is_tagged_and_present() {
        let dict = vec![];
        let tld_dict = HashSet::new();
        let engine = engine_for("example.com", &dict, &tld_dict, None);
        let out = engine.generate();
        assert!(out.iter().any(|p| p.is_original() && p.domain == "example.com"));
    }

    #[test]
    fn tld_swap_never_keeps_original_tld() {
        let dict = vec![];
        let tld_dict: HashSet<String> = ["net".to_string(), "org".to_string(), "com".to_string()]
            .into_iter()
            .collect();
        let fuzzers = only("tld-swap");
        let engine = engine_for("example.com", &dict, &tld_dict, Some(&fuzzers));
        for p in engine.generate() {
            if p.fuzzer == "tld-swap" {
                assert!(!p.domain.ends_with(".com"));
            }
        }
    }

    #[test]
    fn empty_dictionaries_emit_nothing_for_their_fuzzers() {
        let dict = vec![];
        let tld_dict = HashSet::new();
        let fuzzers = only("dictionary");
        let engine = engine_for("example.com", &dict, &tld_dict, Some(&fuzzers));
        let out = engine.generate();
        assert_eq!(out.iter().filter(|p| !p.is_original()).count(), 0);
    }

    #[test]
    fn compound_tld_various_produces_label_and_merged_forms() {
        let dict = vec![];
        let tld_dict = HashSet::new();
        let fuzzers = only("various");
        let engine = engine_for("example.co.uk", &dict, &tld_dict, Some(&fuzzers));
        let permutations = engine.generate();
        let various: HashSet<&str> = permutations
            .iter()
            .filter(|p| p.fuzzer == "various")
            .map(|p| p.domain.as_str())
            .collect();
        assert!(various.contains("example.uk"));
        assert!(various.contains("exampleco.uk"));
        assert!(!various.contains("example.co.uk"));
    }
}
