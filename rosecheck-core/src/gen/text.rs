//! Character, string, symbol, keyword and UUID generators.

use std::fmt;

use uuid::Uuid;

use crate::gen::Gen;
use crate::tree::Tree;

impl Gen<char> {
    /// Any character in the Latin-1 code-point range.
    pub fn char_any() -> Gen<char> {
        Gen::<i64>::choose(0, 255).map(|c| char::from(*c as u8))
    }

    /// Printable ASCII.
    pub fn char_ascii() -> Gen<char> {
        Gen::<i64>::choose(32, 126).map(|c| char::from(*c as u8))
    }

    /// ASCII letters.
    pub fn char_alpha() -> Gen<char> {
        Gen::one_of(vec![Gen::<i64>::choose(65, 90), Gen::<i64>::choose(97, 122)])
            .map(|c| char::from(*c as u8))
    }

    /// ASCII digits and letters. Shrinks toward digits.
    pub fn char_alphanumeric() -> Gen<char> {
        Gen::one_of(vec![
            Gen::<i64>::choose(48, 57),
            Gen::<i64>::choose(65, 90),
            Gen::<i64>::choose(97, 122),
        ])
        .map(|c| char::from(*c as u8))
    }
}

impl Gen<String> {
    /// Strings over the given character generator, length scaled by
    /// size. Shrinks drop characters and shrink the ones that remain.
    pub fn string_of(chars: Gen<char>) -> Gen<String> {
        Gen::<Vec<char>>::vec_of(chars).map(|cs| cs.iter().collect())
    }

    /// Strings over the whole Latin-1 range.
    pub fn string() -> Gen<String> {
        Gen::string_of(Gen::<char>::char_any())
    }

    /// Printable ASCII strings.
    pub fn string_ascii() -> Gen<String> {
        Gen::string_of(Gen::<char>::char_ascii())
    }

    /// Alphabetic strings.
    pub fn string_alpha() -> Gen<String> {
        Gen::string_of(Gen::<char>::char_alpha())
    }

    /// Alphanumeric strings.
    pub fn string_alphanumeric() -> Gen<String> {
        Gen::string_of(Gen::<char>::char_alphanumeric())
    }
}

/// An interned-style symbolic identifier with an optional namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    namespace: Option<String>,
    name: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Symbol {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Symbol {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A keyword: a symbolic identifier rendered with a leading colon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword {
    namespace: Option<String>,
    name: String,
}

impl Keyword {
    pub fn new(name: impl Into<String>) -> Self {
        Keyword {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Keyword {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, ":{}/{}", ns, self.name),
            None => write!(f, ":{}", self.name),
        }
    }
}

const NAME_SPECIALS: [char; 6] = ['*', '+', '!', '-', '_', '?'];

fn name_initial_char() -> Gen<char> {
    Gen::frequency(vec![
        (2, Gen::<char>::char_alpha()),
        (1, Gen::elements(NAME_SPECIALS.to_vec())),
    ])
}

fn name_rest_char() -> Gen<char> {
    Gen::frequency(vec![
        (3, Gen::<char>::char_alphanumeric()),
        (1, Gen::elements(NAME_SPECIALS.to_vec())),
    ])
}

/// A leading sign followed by a digit would read as a number, not a
/// name.
fn reads_as_number(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('+') | Some('-'), Some(d)) if d.is_ascii_digit()
    )
}

/// A name or namespace fragment. Scaled down sharply so symbols stay
/// readable even at large sizes.
fn name_fragment() -> Gen<String> {
    Gen::<(char, Vec<char>)>::tuple_of(name_initial_char(), Gen::vec_of(name_rest_char()))
        .map(|parts| {
            let mut name = String::with_capacity(1 + parts.1.len());
            name.push(parts.0);
            name.extend(parts.1.iter());
            name
        })
        .such_that(|name| !reads_as_number(name))
        .scale(|n| (n as f64).powf(0.46) as usize)
}

impl Gen<Symbol> {
    /// Plain symbols.
    pub fn symbol() -> Gen<Symbol> {
        name_fragment().map(|name| Symbol::new(name.clone()))
    }

    /// Namespaced symbols.
    pub fn symbol_ns() -> Gen<Symbol> {
        Gen::<(String, String)>::tuple_of(name_fragment(), name_fragment())
            .map(|parts| Symbol::namespaced(parts.0.clone(), parts.1.clone()))
    }
}

impl Gen<Keyword> {
    /// Plain keywords.
    pub fn keyword() -> Gen<Keyword> {
        name_fragment().map(|name| Keyword::new(name.clone()))
    }

    /// Namespaced keywords.
    pub fn keyword_ns() -> Gen<Keyword> {
        Gen::<(String, String)>::tuple_of(name_fragment(), name_fragment())
            .map(|parts| Keyword::namespaced(parts.0.clone(), parts.1.clone()))
    }
}

impl Gen<Uuid> {
    /// Type-4 UUIDs from two raw 64-bit draws with the version and
    /// variant bits masked in. Does not shrink.
    pub fn uuid() -> Gen<Uuid> {
        Gen::new(|_size, seed| {
            let (high, seed) = seed.next_u64();
            let (low, _) = seed.next_u64();
            let high = (high & 0xffff_ffff_ffff_0fff) | 0x0000_0000_0000_4000;
            let low = (low & 0x3fff_ffff_ffff_ffff) | 0x8000_0000_0000_0000;
            Ok(Tree::singleton(Uuid::from_u64_pair(high, low)))
        })
    }
}
