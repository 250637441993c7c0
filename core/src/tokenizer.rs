use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

const ENGLISH_STOPWORDS: &[&str] = &[
    "a","about","above","after","again","against","ain","all","am","an","and","any","are","aren","aren't","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","couldn","couldn't",
    "d","did","didn","didn't","do","does","doesn","doesn't","doing","don","don't","down","during",
    "each","few","for","from","further",
    "had","hadn","hadn't","has","hasn","hasn't","have","haven","haven't","having","he","he'd","he'll","he's","her","here","hers","herself","him","himself","his","how",
    "i","i'd","i'll","i'm","i've","if","in","into","is","isn","isn't","it","it'd","it'll","it's","its","itself",
    "just","ll","m","ma","me","mightn","mightn't","more","most","mustn","mustn't","my","myself",
    "needn","needn't","no","nor","not","now","o","of","off","on","once","only","or","other","our","ours","ourselves","out","over","own",
    "re","s","same","shan","shan't","she","she'd","she'll","she's","should","should've","shouldn","shouldn't","so","some","such",
    "t","than","that","that'll","the","their","theirs","them","themselves","then","there","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
    "under","until","up","ve","very",
    "was","wasn","wasn't","we","we'd","we'll","we're","we've","were","weren","weren't","what","when","where","which","while","who","whom","why","will","with","won","won't","wouldn","wouldn't",
    "y","you","you'd","you'll","you're","you've","your","yours","yourself","yourselves",
];

// High-frequency terms of the wiki corpus that carry no signal.
const CORPUS_STOPWORDS: &[&str] = &[
    "category","references","also","external","links",
    "may","first","see","history","people","one","two",
    "part","thumb","including","second","following",
    "many","however","would","became",
];

lazy_static! {
    static ref RE: Regex = Regex::new(r"[a-zA-Z0-9][a-zA-Z0-9\-']{1,23}").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = ENGLISH_STOPWORDS
        .iter()
        .chain(CORPUS_STOPWORDS.iter())
        .copied()
        .collect();
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Every term the tokenizer drops.
pub fn stopwords() -> impl Iterator<Item = &'static str> {
    STOPWORDS.iter().copied()
}

/// Tokenize text into lowercase terms, in order of appearance, with stop terms removed.
///
/// Queries, titles and anchor text all go through this function so that term
/// overlap between them is well defined.
pub fn tokenize(text: &str) -> Vec<String> {
    RE.find_iter(text)
        .map(|mat| mat.as_str().to_ascii_lowercase())
        .filter(|token| !is_stopword(token))
        .collect()
}
