//! Window rules. Matching is pure string work so it can be exercised
//! without a display; property fetching and the monitor/tag fixup live in
//! the manage path.

/// Predicate plus effects for one rule. Empty predicates always hold;
/// `class`/`instance`/`title` are substring matches against the respective
/// window properties, `wtype` compares the `_NET_WM_WINDOW_TYPE` atom name.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub class: Option<&'static str>,
    pub instance: Option<&'static str>,
    pub title: Option<&'static str>,
    pub wtype: Option<&'static str>,
    pub tags: u32,
    pub isfloating: bool,
    pub floatpos: Option<&'static str>,
    pub isterminal: bool,
    pub noswallow: bool,
    pub monitor: i32,
    pub matchonce: bool,
}

impl Rule {
    pub const DEFAULT: Rule = Rule {
        class: None,
        instance: None,
        title: None,
        wtype: None,
        tags: 0,
        isfloating: false,
        floatpos: None,
        isterminal: false,
        noswallow: false,
        monitor: -1,
        matchonce: false,
    };

    pub fn matches(&self, ident: &WindowIdent) -> bool {
        self.title.map_or(true, |t| ident.title.contains(t))
            && self.class.map_or(true, |c| ident.class.contains(c))
            && self.instance.map_or(true, |i| ident.instance.contains(i))
            && self
                .wtype
                .map_or(true, |t| ident.wtype.as_deref() == Some(t))
    }
}

/// The identifying properties of a freshly mapped window.
#[derive(Debug, Clone, Default)]
pub struct WindowIdent {
    pub class: String,
    pub instance: String,
    pub title: String,
    /// Resolved name of the window-type atom, if the property is set.
    pub wtype: Option<String>,
}

/// Accumulated rule effects. Effects compose across every matching rule
/// until one carrying `matchonce` stops the scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleResult {
    pub tags: u32,
    pub isfloating: bool,
    pub isterminal: bool,
    pub noswallow: bool,
    pub monitor: i32,
    pub floatpos: Option<&'static str>,
    /// A scratchpad rule with `isfloating` pre-centers the client.
    pub center: bool,
}

pub fn evaluate(rules: &[Rule], ident: &WindowIdent) -> RuleResult {
    let mut out = RuleResult {
        monitor: -1,
        ..Default::default()
    };
    for r in rules {
        if !r.matches(ident) {
            continue;
        }
        out.isterminal |= r.isterminal;
        out.noswallow |= r.noswallow;
        out.isfloating = r.isfloating;
        out.tags |= r.tags;
        if r.monitor >= 0 {
            out.monitor = r.monitor;
        }
        if r.tags & crate::config::SPTAGMASK != 0 && r.isfloating {
            out.center = true;
        }
        if r.isfloating && r.floatpos.is_some() {
            out.floatpos = r.floatpos;
        }
        if r.matchonce {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SPTAG;

    fn ident(class: &str, instance: &str, title: &str) -> WindowIdent {
        WindowIdent {
            class: class.into(),
            instance: instance.into(),
            title: title.into(),
            wtype: None,
        }
    }

    #[test]
    fn empty_predicates_match_everything() {
        let r = Rule::DEFAULT;
        assert!(r.matches(&ident("Anything", "at", "all")));
    }

    #[test]
    fn class_and_title_are_substring_matches() {
        let r = Rule {
            class: Some("discord"),
            ..Rule::DEFAULT
        };
        assert!(r.matches(&ident("discord-canary", "x", "y")));
        assert!(!r.matches(&ident("Discord", "x", "y")), "matching is case-sensitive");

        let r = Rule {
            title: Some("Updater"),
            ..Rule::DEFAULT
        };
        assert!(r.matches(&ident("x", "y", "Discord Updater")));
    }

    #[test]
    fn window_type_compares_atom_names() {
        let r = Rule {
            wtype: Some("_NET_WM_WINDOW_TYPE_DIALOG"),
            ..Rule::DEFAULT
        };
        let mut id = ident("a", "b", "c");
        assert!(!r.matches(&id));
        id.wtype = Some("_NET_WM_WINDOW_TYPE_DIALOG".into());
        assert!(r.matches(&id));
        id.wtype = Some("_NET_WM_WINDOW_TYPE_UTILITY".into());
        assert!(!r.matches(&id));
    }

    #[test]
    fn effects_accumulate_across_rules() {
        let rules = [
            Rule {
                class: Some("term"),
                isterminal: true,
                ..Rule::DEFAULT
            },
            Rule {
                class: Some("term"),
                tags: 1 << 3,
                ..Rule::DEFAULT
            },
        ];
        let out = evaluate(&rules, &ident("term", "term", ""));
        assert!(out.isterminal);
        assert_eq!(out.tags, 1 << 3);
    }

    #[test]
    fn matchonce_stops_the_scan() {
        let rules = [
            Rule {
                instance: Some("kitty-sp"),
                tags: SPTAG(0),
                isfloating: true,
                matchonce: true,
                floatpos: Some("50% 50% 90% 80%"),
                ..Rule::DEFAULT
            },
            Rule {
                tags: 1 << 8,
                ..Rule::DEFAULT
            },
        ];
        let out = evaluate(&rules, &ident("kitty", "kitty-sp", ""));
        assert_eq!(out.tags, SPTAG(0));
        assert!(out.isfloating);
        assert!(out.center, "scratchpad rules pre-center the client");
        assert_eq!(out.floatpos, Some("50% 50% 90% 80%"));
        // applying the set twice changes nothing
        assert_eq!(evaluate(&rules, &ident("kitty", "kitty-sp", "")), out);
    }

    #[test]
    fn later_rules_overwrite_floating() {
        let rules = [
            Rule {
                class: Some("lutris"),
                isfloating: true,
                ..Rule::DEFAULT
            },
            Rule {
                class: Some("lutris"),
                isfloating: false,
                ..Rule::DEFAULT
            },
        ];
        assert!(!evaluate(&rules, &ident("lutris", "", "")).isfloating);
    }
}
