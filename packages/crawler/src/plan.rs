/// Letters in descending order of frequency in English text.
pub const LETTERS_BY_FREQUENCY: [char; 26] = [
    'e', 't', 'a', 'o', 'i', 'n', 's', 'h', 'r', 'd', 'l', 'u', 'c', 'm', 'w', 'f', 'g', 'y', 'p',
    'b', 'v', 'k', 'j', 'x', 'q', 'z',
];

/// How many of the most frequent letters are paired up for two-letter terms.
pub const COMBINATION_LETTERS: usize = 8;

/// Percent of the candidate budget spent on single-letter terms.
const SINGLE_LETTER_SHARE: u64 = 60;
/// Percent of the candidate budget spent on two-letter terms.
const COMBINATION_SHARE: u64 = 40;

/// One wildcard search term and how many pages of it to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBucket {
    pub term: String,
    pub pages: u32,
}

/// The deterministic sequence of searches for one crawl.
///
/// The crawler aims for twice the desired number of artists so that the
/// least popular half can be dropped later. 60% of that budget goes to
/// single-letter terms ("e*", "t*", ...) and 40% to two-letter terms built
/// from the eight most frequent letters ("ee*", "et*", ...).
#[derive(Debug, Clone)]
pub struct CrawlPlan {
    pub buckets: Vec<SearchBucket>,
    pub page_size: u32,
}

impl CrawlPlan {
    pub fn new(target_artist_count: u64, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        let target_candidates = target_artist_count.saturating_mul(2);

        let single_target = target_candidates * SINGLE_LETTER_SHARE / 100;
        let single_pages = pages_for(single_target / LETTERS_BY_FREQUENCY.len() as u64, page_size);

        let top = &LETTERS_BY_FREQUENCY[..COMBINATION_LETTERS];
        let combination_target = target_candidates * COMBINATION_SHARE / 100;
        let combination_pages =
            pages_for(combination_target / (top.len() * top.len()) as u64, page_size);

        let singles = LETTERS_BY_FREQUENCY.iter().map(|l| SearchBucket {
            term: format!("{l}*"),
            pages: single_pages,
        });
        let pairs = top.iter().flat_map(|l1| {
            top.iter().map(move |l2| SearchBucket {
                term: format!("{l1}{l2}*"),
                pages: combination_pages,
            })
        });

        Self {
            buckets: singles.chain(pairs).collect(),
            page_size,
        }
    }

    /// Number of search requests the plan issues.
    pub fn total_requests(&self) -> u64 {
        self.buckets.iter().map(|b| u64::from(b.pages)).sum()
    }
}

/// `ceil(artists / page_size)`, never less than one page.
fn pages_for(artists: u64, page_size: u32) -> u32 {
    let pages = artists.div_ceil(u64::from(page_size)).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
