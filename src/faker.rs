//! Locale-diverse fake data provider.
//!
//! Keeps a fixed pool of locale-specific generators and picks one uniformly
//! at random per request, so seeded datasets are not monocultural. All
//! output is a pure function of the injected RNG.

use chrono::{Duration, NaiveDateTime};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Locale pool for name generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    ArSa,
    DeDe,
    En,
    FrFr,
    ItIt,
    JaJp,
    PtBr,
    PtPt,
    ZhCn,
    ZhTw,
}

impl Locale {
    pub const ALL: [Locale; 10] = [
        Locale::ArSa,
        Locale::DeDe,
        Locale::En,
        Locale::FrFr,
        Locale::ItIt,
        Locale::JaJp,
        Locale::PtBr,
        Locale::PtPt,
        Locale::ZhCn,
        Locale::ZhTw,
    ];

    fn company_name(self, rng: &mut StdRng) -> String {
        use fake::faker::company::raw::CompanyName;
        use fake::locales::{AR_SA, DE_DE, EN, FR_FR, IT_IT, JA_JP, PT_BR, PT_PT, ZH_CN, ZH_TW};
        match self {
            Locale::ArSa => CompanyName(AR_SA).fake_with_rng(rng),
            Locale::DeDe => CompanyName(DE_DE).fake_with_rng(rng),
            Locale::En => CompanyName(EN).fake_with_rng(rng),
            Locale::FrFr => CompanyName(FR_FR).fake_with_rng(rng),
            Locale::ItIt => CompanyName(IT_IT).fake_with_rng(rng),
            Locale::JaJp => CompanyName(JA_JP).fake_with_rng(rng),
            Locale::PtBr => CompanyName(PT_BR).fake_with_rng(rng),
            Locale::PtPt => CompanyName(PT_PT).fake_with_rng(rng),
            Locale::ZhCn => CompanyName(ZH_CN).fake_with_rng(rng),
            Locale::ZhTw => CompanyName(ZH_TW).fake_with_rng(rng),
        }
    }
}

/// Fake scalar generator, deterministic given its RNG
pub struct FieldFaker<R: Rng> {
    rng: R,
}

impl<R: Rng> FieldFaker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Pick a locale uniformly from the pool
    pub fn locale(&mut self) -> Locale {
        Locale::ALL[self.rng.random_range(0..Locale::ALL.len())]
    }

    /// Generate a company name in a randomly chosen locale
    pub fn company_name(&mut self) -> String {
        let locale = self.locale();
        let mut fake_rng = self.bridge_rng();
        locale.company_name(&mut fake_rng)
    }

    // The fake crate wants its own rng type; reseed one from our stream so
    // determinism is preserved.
    fn bridge_rng(&mut self) -> StdRng {
        let mut seed = [0u8; 32];
        self.rng.fill_bytes(&mut seed);
        StdRng::from_seed(seed)
    }

    /// Generate a lowercase hex string of exactly `len` characters
    pub fn hex_string(&mut self, len: usize) -> String {
        let mut bytes = vec![0u8; len.div_ceil(2)];
        self.rng.fill_bytes(&mut bytes);
        let mut out = hex::encode(bytes);
        out.truncate(len);
        out
    }

    /// Generate a SHA-256-shaped content digest (64 hex characters)
    pub fn sha256_digest(&mut self) -> String {
        let mut input = [0u8; 32];
        self.rng.fill_bytes(&mut input);
        hex::encode(Sha256::digest(input))
    }

    /// Generate a v4-shaped UUID string from the RNG stream
    pub fn uuid(&mut self) -> String {
        format!(
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            self.rng.random::<u32>(),
            self.rng.random::<u16>(),
            (self.rng.random::<u16>() & 0x0FFF) | 0x4000, // Version 4
            (self.rng.random::<u16>() & 0x3FFF) | 0x8000, // Variant
            self.rng.random::<u64>() & 0xFFFF_FFFF_FFFF_u64
        )
    }

    /// Generate a contract version like `v3.2`
    pub fn version(&mut self) -> String {
        format!(
            "v{}.{}",
            self.rng.random_range(1..=5),
            self.rng.random_range(0..=9)
        )
    }

    /// Generate a random integer in the inclusive range
    pub fn int_range(&mut self, min: i64, max: i64) -> i64 {
        self.rng.random_range(min..=max)
    }

    /// Timestamp uniformly distributed in `[start, end]`.
    ///
    /// `start == end` (or an inverted range) returns `start`.
    pub fn datetime_between(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
        let span = (end - start).num_seconds();
        if span <= 0 {
            return start;
        }
        start + Duration::seconds(self.rng.random_range(0..=span))
    }

    /// Pick a random element from a non-empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.rng.random_range(0..items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand_chacha::ChaCha8Rng;

    fn faker(seed: u64) -> FieldFaker<ChaCha8Rng> {
        FieldFaker::new(ChaCha8Rng::seed_from_u64(seed))
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_deterministic_generation() {
        let mut a = faker(42);
        let mut b = faker(42);

        assert_eq!(a.company_name(), b.company_name());
        assert_eq!(a.hex_string(20), b.hex_string(20));
        assert_eq!(a.sha256_digest(), b.sha256_digest());
        assert_eq!(a.uuid(), b.uuid());
    }

    #[test]
    fn test_hex_string_length_and_charset() {
        let mut f = faker(7);
        for len in [1, 2, 19, 20, 40, 64] {
            let s = f.hex_string(len);
            assert_eq!(s.len(), len);
            assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_uppercase()));
        }
    }

    #[test]
    fn test_sha256_digest_shape() {
        let mut f = faker(7);
        let digest = f.sha256_digest();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_uuid_shape() {
        let mut f = faker(7);
        let id = f.uuid();
        assert_eq!(id.len(), 36);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(
            parts.iter().map(|p| p.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12]
        );
        assert!(parts[2].starts_with('4'));
        assert!(matches!(parts[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
    }

    #[test]
    fn test_datetime_between_bounds() {
        let mut f = faker(7);
        let start = ts("2024-01-01 00:00:00");
        let end = ts("2025-01-01 00:00:00");
        for _ in 0..100 {
            let t = f.datetime_between(start, end);
            assert!(t >= start && t <= end);
        }
    }

    #[test]
    fn test_datetime_between_equal_bounds() {
        let mut f = faker(7);
        let instant = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(f.datetime_between(instant, instant), instant);
    }

    #[test]
    fn test_version_shape() {
        let mut f = faker(7);
        for _ in 0..20 {
            let v = f.version();
            assert!(v.starts_with('v'));
            let (major, minor) = v[1..].split_once('.').unwrap();
            let major: u32 = major.parse().unwrap();
            let minor: u32 = minor.parse().unwrap();
            assert!((1..=5).contains(&major));
            assert!(minor <= 9);
        }
    }

    #[test]
    fn test_locale_pool_is_fixed() {
        assert_eq!(Locale::ALL.len(), 10);
        let mut f = faker(7);
        for _ in 0..50 {
            assert!(Locale::ALL.contains(&f.locale()));
        }
    }
}
