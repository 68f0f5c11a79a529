//! Field tag mini-language.
//!
//! A tag has the shape `name[,opt1][,opt2]...` where `name` is either an
//! external key, empty (use the field's own identifier, or flatten a
//! nested struct), or `-` (exclude the field entirely). Recognized
//! options are `default=v1;v2;...` and `omitempty`; unknown options are
//! ignored for forward compatibility.

/// Sentinel name excluding a field from the schema.
pub const SKIP_TAG: &str = "-";

const OPT_DEFAULT: &str = "default";
const OPT_OMITEMPTY: &str = "omitempty";

/// Parsed meaning of one field's tag string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDirective {
    /// External key; empty means "use the declared field identifier"
    /// (or flatten, when the field is a nested struct).
    pub name: String,
    /// Default values applied when the input has no entry for the key.
    pub defaults: Vec<String>,
    /// Suppress the field from encoded output when its value is the
    /// zero value for its kind.
    pub omit_empty: bool,
    /// Field is excluded from the schema entirely.
    pub skip: bool,
}

impl FieldDirective {
    /// Parse one raw tag string.
    pub fn parse(tag: &str) -> FieldDirective {
        if tag == SKIP_TAG {
            return FieldDirective {
                skip: true,
                ..FieldDirective::default()
            };
        }

        let (name, mut opts) = head(tag, ',');
        let mut directive = FieldDirective {
            name: name.to_string(),
            ..FieldDirective::default()
        };

        while !opts.is_empty() {
            let (opt, rest) = head(opts, ',');
            opts = rest;

            let (key, value) = head(opt, '=');
            match key {
                OPT_DEFAULT => {
                    directive.defaults = value.split(';').map(str::to_string).collect();
                }
                OPT_OMITEMPTY => directive.omit_empty = true,
                _ => {}
            }
        }

        directive
    }
}

/// Split `s` at the first `sep`, yielding `(s, "")` when absent.
fn head(s: &str, sep: char) -> (&str, &str) {
    match s.split_once(sep) {
        Some((h, t)) => (h, t),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        let d = FieldDirective::parse("age");
        assert_eq!(d.name, "age");
        assert!(d.defaults.is_empty());
        assert!(!d.omit_empty);
        assert!(!d.skip);
    }

    #[test]
    fn test_empty_tag() {
        let d = FieldDirective::parse("");
        assert_eq!(d.name, "");
        assert!(!d.skip);
    }

    #[test]
    fn test_skip_marker() {
        assert!(FieldDirective::parse("-").skip);
    }

    #[test]
    fn test_default_option() {
        let d = FieldDirective::parse("age,default=20");
        assert_eq!(d.name, "age");
        assert_eq!(d.defaults, vec!["20"]);
    }

    #[test]
    fn test_default_list_splits_on_semicolon() {
        let d = FieldDirective::parse("tags,default=a;b;c");
        assert_eq!(d.defaults, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_omitempty_and_default_combined() {
        let d = FieldDirective::parse("score,default=1,omitempty");
        assert_eq!(d.name, "score");
        assert_eq!(d.defaults, vec!["1"]);
        assert!(d.omit_empty);
    }

    #[test]
    fn test_unknown_options_ignored() {
        let d = FieldDirective::parse("name,required,foo=bar");
        assert_eq!(d.name, "name");
        assert!(d.defaults.is_empty());
        assert!(!d.omit_empty);
    }
}
