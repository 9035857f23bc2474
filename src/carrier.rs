//! User-agent classification for the three Japanese feature-phone carriers.
//!
//! Pure functions over the UA string; nothing here touches the rewrite
//! engine. The docomo check is case-insensitive, the KDDI check is not
//! (some 2G au phones escape it, which is accepted), and SoftBank phones
//! identify as either SoftBank or Vodafone at the start of the string.

/// Classification record for one user-agent string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CarrierProfile {
    pub docomo: bool,
    pub au: bool,
    pub softbank: bool,
    pub imode_browser_1_0: bool,
    pub au_browser_6: bool,
}

impl CarrierProfile {
    pub fn classify(user_agent: &str) -> Self {
        let docomo = contains_ignore_case(user_agent, "docomo");
        let au = user_agent.contains("KDDI");
        let softbank =
            user_agent.starts_with("SoftBank") || user_agent.starts_with("Vodafone");
        CarrierProfile {
            docomo,
            au,
            softbank,
            imode_browser_1_0: docomo && imode_cache_size(user_agent).unwrap_or(0) < 500,
            au_browser_6: au && is_au_browser_6(user_agent),
        }
    }

    /// Any of the three carriers.
    pub fn feature_phone(&self) -> bool {
        self.docomo || self.au || self.softbank
    }

    /// au and SoftBank terminals present a different cookie store over SSL.
    pub fn different_cookie_in_ssl(&self) -> bool {
        self.au || self.softbank
    }

    /// Only the i-mode 1.0 browser generation needs CSS inlined; i-mode 2.0
    /// applies stylesheets itself.
    pub fn wants_inline_css(&self) -> bool {
        self.imode_browser_1_0
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(needle)
}

/// Cache capacity from the parenthesized parameter list of a docomo UA,
/// e.g. `DoCoMo/2.0 P906i(c100;TB;W24H15)` -> 100. Browsers reporting 500
/// or more are the i-mode 2.0 generation. UAs without the token (the old
/// `DoCoMo/1.0/...` form) report nothing.
fn imode_cache_size(user_agent: &str) -> Option<u32> {
    let open = user_agent.find('(')?;
    let close = user_agent[open..].find(')')? + open;
    user_agent[open + 1..close].split(';').find_map(|param| {
        let digits = param.trim().strip_prefix('c')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    })
}

/// UP.Browser 6.x, excluding the fixed 6.2_7 release.
fn is_au_browser_6(user_agent: &str) -> bool {
    let Some(kddi) = user_agent.find("KDDI") else {
        return false;
    };
    user_agent[kddi..].contains(" UP.Browser/6.")
        && !user_agent.contains("UP.Browser/6.2_7")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCOMO_1_0: &str = "DoCoMo/1.0/D501i";
    const DOCOMO_1_0_CACHE: &str = "DoCoMo/1.0/P502i/c10";
    const DOCOMO_2_0: &str = "DoCoMo/2.0 P906i(c500;TB;W24H15)";
    const DOCOMO_2_0_SMALL_CACHE: &str = "DoCoMo/2.0 SH902i(c100;TB;W24H12)";
    const AU: &str = "KDDI-HI31 UP.Browser/6.2.0.5 (GUI) MMP/2.0";
    const AU_6_2_7: &str = "KDDI-CA39 UP.Browser/6.2_7.2.7 (GUI) MMP/2.0";
    const SOFTBANK: &str = "SoftBank/1.0/910T/TJ001/SN000000000000000 Browser/NetFront/3.3";
    const VODAFONE: &str = "Vodafone/1.0/V904SH/SHJ001 Browser/VF-NetFront/3.3";
    const PC: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/78.0";

    #[test]
    fn docomo_detection_is_case_insensitive() {
        assert!(CarrierProfile::classify(DOCOMO_1_0).docomo);
        assert!(CarrierProfile::classify("docomo/2.0 N905i(c100;TB)").docomo);
        assert!(!CarrierProfile::classify(PC).docomo);
    }

    #[test]
    fn au_and_softbank_detection() {
        assert!(CarrierProfile::classify(AU).au);
        assert!(CarrierProfile::classify(SOFTBANK).softbank);
        assert!(CarrierProfile::classify(VODAFONE).softbank);
        assert!(!CarrierProfile::classify(PC).feature_phone());
    }

    #[test]
    fn imode_generation_split() {
        assert!(CarrierProfile::classify(DOCOMO_1_0).imode_browser_1_0);
        assert!(CarrierProfile::classify(DOCOMO_1_0_CACHE).imode_browser_1_0);
        assert!(CarrierProfile::classify(DOCOMO_2_0_SMALL_CACHE).imode_browser_1_0);
        assert!(!CarrierProfile::classify(DOCOMO_2_0).imode_browser_1_0);
        assert!(!CarrierProfile::classify(AU).imode_browser_1_0);
    }

    #[test]
    fn au_browser_6_excludes_6_2_7() {
        assert!(CarrierProfile::classify(AU).au_browser_6);
        assert!(!CarrierProfile::classify(AU_6_2_7).au_browser_6);
        assert!(!CarrierProfile::classify(SOFTBANK).au_browser_6);
    }

    #[test]
    fn derived_predicates() {
        let au = CarrierProfile::classify(AU);
        assert!(au.feature_phone());
        assert!(au.different_cookie_in_ssl());
        assert!(!au.wants_inline_css());

        let docomo = CarrierProfile::classify(DOCOMO_1_0);
        assert!(docomo.wants_inline_css());
        assert!(!docomo.different_cookie_in_ssl());
    }
}
