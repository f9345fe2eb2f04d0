//! Case transforms applied to staged names by the `case` command.

/// A named string transform. Several transforms come in pairs (kebab/dekebab,
/// snake/desnake, squash/unsquash) so a rename can be round-tripped by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    Upper,
    Lower,
    Title,
    Kebab,
    Dekebab,
    Snake,
    Desnake,
    Squash,
    Trim,
    Camel,
    Pascal,
    Unsquash,
    Sponge,
}

impl CaseStyle {
    /// Look up a style by its full name or short alias.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "upper" | "u" => Some(Self::Upper),
            "lower" | "l" => Some(Self::Lower),
            "title" | "t" => Some(Self::Title),
            "kebab" | "k" => Some(Self::Kebab),
            "dekebab" | "dk" => Some(Self::Dekebab),
            "snake" | "s" => Some(Self::Snake),
            "desnake" | "ds" => Some(Self::Desnake),
            "squash" | "sq" => Some(Self::Squash),
            "trim" | "tr" => Some(Self::Trim),
            "camel" | "c" => Some(Self::Camel),
            "pascal" | "p" => Some(Self::Pascal),
            "unsquash" | "us" => Some(Self::Unsquash),
            "sponge" | "b" => Some(Self::Sponge),
            _ => None,
        }
    }

    /// Apply the transform to `s`, returning the new string.
    pub fn apply(self, s: &str) -> String {
        match self {
            Self::Upper => s.to_uppercase(),
            Self::Lower => s.to_lowercase(),
            Self::Title => title(s),
            Self::Kebab => join_words(s, "-"),
            Self::Dekebab => rejoin(s, '-'),
            Self::Snake => join_words(s, "_"),
            Self::Desnake => rejoin(s, '_'),
            Self::Squash => s.split_whitespace().collect(),
            Self::Trim => join_words(s, " "),
            Self::Camel => camel(s),
            Self::Pascal => pascal(s),
            Self::Unsquash => unsquash(s),
            Self::Sponge => sponge(s),
        }
    }
}

/// Split on whitespace runs and rejoin with `sep`. Also collapses repeated
/// whitespace and trims the ends, which is all `trim` does.
fn join_words(s: &str, sep: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(sep)
}

/// Replace every `sep` with a space. Empty segments are kept, so
/// `a--b` becomes `a  b`.
fn rejoin(s: &str, sep: char) -> String {
    s.split(sep).collect::<Vec<_>>().join(" ")
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// First word lowercased whole, remaining words title-cased, joined together.
fn camel(s: &str) -> String {
    let mut words = s.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut out = first.to_lowercase();
    for word in words {
        out.push_str(&title(word));
    }
    out
}

fn pascal(s: &str) -> String {
    s.split_whitespace().map(title).collect()
}

/// Inverse of squash for camel/Pascal names: a space goes in front of every
/// uppercase character.
fn unsquash(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        if c.is_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out.trim().to_string()
}

/// sPonGeBOb CasE: every letter flips a coin.
fn sponge(s: &str) -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_alphabetic() {
            if rng.random_bool(0.5) {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_the_same_style() {
        assert_eq!(CaseStyle::from_name("upper"), Some(CaseStyle::Upper));
        assert_eq!(CaseStyle::from_name("u"), Some(CaseStyle::Upper));
        assert_eq!(CaseStyle::from_name("dk"), Some(CaseStyle::Dekebab));
        assert_eq!(CaseStyle::from_name("b"), Some(CaseStyle::Sponge));
        assert_eq!(CaseStyle::from_name("bogus"), None);
    }

    #[test]
    fn title_capitalizes_each_word() {
        assert_eq!(CaseStyle::Title.apply("my file name"), "My File Name");
        assert_eq!(CaseStyle::Title.apply("ALREADY UP"), "Already Up");
        assert_eq!(CaseStyle::Title.apply("x1a"), "X1A");
    }

    #[test]
    fn kebab_and_snake_round_trip() {
        assert_eq!(CaseStyle::Kebab.apply("my file  name"), "my-file-name");
        assert_eq!(CaseStyle::Dekebab.apply("my-file-name"), "my file name");
        assert_eq!(CaseStyle::Snake.apply("my file"), "my_file");
        assert_eq!(CaseStyle::Desnake.apply("my_file"), "my file");
    }

    #[test]
    fn squash_trim_and_unsquash() {
        assert_eq!(CaseStyle::Squash.apply("File  name"), "Filename");
        assert_eq!(CaseStyle::Trim.apply("  Long  File   Name "), "Long File Name");
        assert_eq!(CaseStyle::Unsquash.apply("PascalCase"), "Pascal Case");
        assert_eq!(CaseStyle::Unsquash.apply("camelCase"), "camel Case");
    }

    #[test]
    fn camel_and_pascal() {
        assert_eq!(CaseStyle::Camel.apply("my file name"), "myFileName");
        assert_eq!(CaseStyle::Camel.apply("SHOUTY name"), "shoutyName");
        assert_eq!(CaseStyle::Pascal.apply("my file name"), "MyFileName");
        assert_eq!(CaseStyle::Camel.apply(""), "");
    }

    #[test]
    fn sponge_only_changes_letter_case() {
        let spun = CaseStyle::Sponge.apply("file name-01");
        assert_eq!(spun.to_lowercase(), "file name-01");
        assert_eq!(spun.chars().count(), "file name-01".chars().count());
    }
}
