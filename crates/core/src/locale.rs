//! Display-name locale classification.
//!
//! Decides whether a profile's display name plausibly belongs to the target
//! name-space (US-style personal names). The classifier gates the whole
//! resolution cascade, so it is conservative: anything it cannot make sense of
//! is rejected.

use std::collections::HashSet;

use tracing::debug;

use crate::config::LocaleConfig;

/// Decides whether a display name is in the target locale.
pub trait NameClassifier: Send + Sync {
    /// `None`, empty, and unclassifiable input all yield `false`.
    fn classify(&self, display_name: Option<&str>) -> bool;
}

const GIVEN_NAMES: &[&str] = &[
    "aaron", "adam", "alan", "albert", "alex", "alexander", "alexandra", "alice", "alicia",
    "allison", "amanda", "amber", "amy", "andrea", "andrew", "angela", "ann", "anna", "anne",
    "anthony", "arthur", "ashley", "austin", "barbara", "benjamin", "beth", "betty", "bill",
    "billy", "bob", "bobby", "brad", "bradley", "brandon", "brenda", "brian", "brittany",
    "bruce", "bryan", "carl", "carol", "carolyn", "catherine", "charles", "charlie", "cheryl",
    "chris", "christian", "christina", "christine", "christopher", "cindy", "cody", "connor",
    "craig", "cynthia", "dan", "daniel", "danielle", "david", "dave", "deborah", "debra",
    "dennis", "diana", "diane", "donald", "donna", "doris", "dorothy", "douglas", "dylan",
    "edward", "elizabeth", "emily", "emma", "eric", "ethan", "eugene", "evelyn", "frances",
    "frank", "gary", "george", "gerald", "gloria", "grace", "greg", "gregory", "hannah",
    "harold", "heather", "helen", "henry", "jack", "jacob", "jacqueline", "james", "jane",
    "janet", "janice", "jason", "jean", "jeff", "jeffrey", "jennifer", "jeremy", "jerry",
    "jesse", "jessica", "jim", "joan", "joe", "john", "johnny", "jon", "jonathan", "jordan",
    "jose", "joseph", "joshua", "joyce", "judith", "judy", "julia", "julie", "justin", "karen",
    "katherine", "kathleen", "kathryn", "kayla", "keith", "kelly", "kenneth", "kevin",
    "kimberly", "kyle", "larry", "laura", "lauren", "lawrence", "linda", "lisa", "logan",
    "lori", "louis", "madison", "margaret", "maria", "marie", "marilyn", "mark", "martha",
    "mary", "matt", "matthew", "megan", "melissa", "michael", "michelle", "mike", "mona",
    "nancy", "natalie", "nathan", "nicholas", "nick", "nicole", "noah", "olivia", "pamela",
    "patricia", "patrick", "paul", "peter", "philip", "rachel", "ralph", "randy", "raymond",
    "rebecca", "richard", "rick", "robert", "roger", "ronald", "rose", "roy", "russell",
    "ruth", "ryan", "samantha", "samuel", "sandra", "sara", "sarah", "scott", "sean",
    "sharon", "shirley", "sophia", "stephanie", "stephen", "steve", "steven", "susan",
    "teresa", "terry", "thomas", "tim", "timothy", "tom", "tony", "tyler", "victoria",
    "vincent", "virginia", "walter", "wayne", "william", "willie", "zachary",
];

const SURNAMES: &[&str] = &[
    "adams", "allen", "alvarez", "anderson", "bailey", "baker", "barnes", "bell", "bennett",
    "brooks", "brown", "bryant", "butler", "campbell", "carter", "castillo", "clark",
    "collins", "cook", "cooper", "cox", "cruz", "davis", "diaz", "doe", "edwards", "evans",
    "fisher", "flores", "ford", "foster", "garcia", "gomez", "gonzalez", "gray", "green",
    "griffin", "hall", "hamilton", "harris", "hayes", "henderson", "hernandez", "hill",
    "howard", "hughes", "jackson", "james", "jenkins", "johnson", "jones", "kelly", "kim",
    "king", "lee", "lewis", "long", "lopez", "martin", "martinez", "miller", "mitchell",
    "moore", "morales", "morgan", "morris", "murphy", "myers", "nelson", "nguyen", "ortiz",
    "parker", "patel", "perez", "perry", "peterson", "phillips", "powell", "price",
    "ramirez", "reed", "reyes", "richardson", "rivera", "roberts", "robinson", "rodriguez",
    "rogers", "ross", "russell", "sanchez", "sanders", "scott", "smith", "stewart",
    "sullivan", "taylor", "thomas", "thompson", "torres", "turner", "walker", "ward",
    "washington", "watson", "white", "williams", "wilson", "wood", "wright", "young",
];

/// Dictionary-backed classifier for US-style names.
///
/// A name is accepted when it has two to four word tokens made of ASCII
/// letters (internal `-` and `'` allowed, single-letter middle initials
/// allowed) and either the first token is a known given name or the last
/// token is a known surname.
#[derive(Debug, Clone)]
pub struct DictionaryNameClassifier {
    given_names: HashSet<String>,
    surnames: HashSet<String>,
}

impl Default for DictionaryNameClassifier {
    fn default() -> Self {
        Self::new(&LocaleConfig::default())
    }
}

impl DictionaryNameClassifier {
    /// Build from the embedded dictionaries plus any configured extras.
    pub fn new(config: &LocaleConfig) -> Self {
        let given_names = GIVEN_NAMES
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_given_names.iter().map(|s| s.to_lowercase()))
            .collect();
        let surnames = SURNAMES
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_surnames.iter().map(|s| s.to_lowercase()))
            .collect();
        Self {
            given_names,
            surnames,
        }
    }
}

impl NameClassifier for DictionaryNameClassifier {
    fn classify(&self, display_name: Option<&str>) -> bool {
        let Some(name) = display_name.map(str::trim).filter(|n| !n.is_empty()) else {
            return false;
        };

        let tokens: Vec<String> = name
            .split_whitespace()
            .map(|t| t.trim_end_matches(['.', ',']).to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        if !(2..=4).contains(&tokens.len()) {
            debug!(name, "name rejected: token count");
            return false;
        }

        let last = tokens.len() - 1;
        for (i, token) in tokens.iter().enumerate() {
            let is_initial = token.len() == 1 && i != 0 && i != last;
            if !is_initial && !is_name_word(token) {
                debug!(name, token = %token, "name rejected: token shape");
                return false;
            }
        }

        self.given_names.contains(&tokens[0]) || self.surnames.contains(&tokens[last])
    }
}

/// Two or more ASCII letters, optionally joined by single `-` or `'`.
fn is_name_word(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    if !bytes[0].is_ascii_alphabetic() || !bytes[bytes.len() - 1].is_ascii_alphabetic() {
        return false;
    }
    bytes.windows(2).all(|w| {
        let joiner = |b: u8| b == b'-' || b == b'\'';
        (w[0].is_ascii_alphabetic() || joiner(w[0]))
            && (w[1].is_ascii_alphabetic() || joiner(w[1]))
            && !(joiner(w[0]) && joiner(w[1]))
    })
}
