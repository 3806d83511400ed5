//! Rating records, transaction snapshots and their boolean encoding.
//!
//! The mining pipeline never sees raw CSV rows: loaders construct typed
//! `Rating` records, and `Ratings::to_transactions` turns them into
//! per-user item sets over a canonical sorted vocabulary. The resulting
//! `Transactions` value is the input to every miner.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hasher;

use ndarray::Array2;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use siphasher::sip::SipHasher;

use ItemId;

/// A single user-item interaction record with explicit feedback.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(rename = "movieTitle")]
    title: String,
    rating: f32,
}

impl Rating {
    /// Build a new rating record.
    pub fn new<S: Into<String>, T: Into<String>>(user_id: S, title: T, rating: f32) -> Self {
        Rating {
            user_id: user_id.into(),
            title: title.into(),
            rating: rating,
        }
    }

    /// The identifier of the rating user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The title of the rated item.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The rating value.
    pub fn rating(&self) -> f32 {
        self.rating
    }
}

/// Feedback interpretation of rating values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    /// Ratings are explicit scores; only items rated at or above the
    /// positivity threshold (3.0) count as liked.
    Explicit,
    /// Every interaction counts as liked, regardless of the rating value.
    Implicit,
}

/// Minimum rating for an explicit interaction to count as liked.
const POSITIVITY_THRESHOLD: f32 = 3.0;

/// An ordered collection of rating records.
pub struct Ratings {
    ratings: Vec<Rating>,
}

impl Ratings {
    /// The underlying records.
    pub fn data(&self) -> &[Rating] {
        &self.ratings
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Whether the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Shuffle the records in place.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        rng.shuffle(&mut self.ratings);
    }

    /// Split into two collections at `idx`.
    pub fn split_at(&self, idx: usize) -> (Self, Self) {
        let head = Ratings {
            ratings: self.ratings[..idx].to_owned(),
        };
        let tail = Ratings {
            ratings: self.ratings[idx..].to_owned(),
        };

        (head, tail)
    }

    /// Split into two collections by a predicate over records.
    pub fn split_by<F: Fn(&Rating) -> bool>(&self, func: F) -> (Self, Self) {
        let head = Ratings {
            ratings: self.ratings.iter().filter(|x| func(x)).cloned().collect(),
        };
        let tail = Ratings {
            ratings: self.ratings.iter().filter(|x| !func(x)).cloned().collect(),
        };

        (head, tail)
    }

    /// Group the records into per-user transactions.
    ///
    /// Under `Feedback::Explicit` only ratings of at least 3.0 are kept;
    /// under `Feedback::Implicit` every record counts. Users whose
    /// records are all filtered out contribute no transaction. Items
    /// within a transaction are unique.
    pub fn to_transactions(&self, feedback: Feedback) -> Transactions {
        let kept: Vec<&Rating> = self
            .ratings
            .iter()
            .filter(|x| match feedback {
                Feedback::Explicit => x.rating >= POSITIVITY_THRESHOLD,
                Feedback::Implicit => true,
            })
            .collect();

        // Canonical vocabulary: sorted unique titles, ids are positions.
        let vocabulary: BTreeSet<&str> = kept.iter().map(|x| x.title.as_str()).collect();
        let items: Vec<String> = vocabulary.into_iter().map(|x| x.to_owned()).collect();
        let index: HashMap<String, ItemId> = items
            .iter()
            .enumerate()
            .map(|(id, title)| (title.clone(), id))
            .collect();

        // Users keep their first-appearance order.
        let mut user_index: HashMap<String, usize> = HashMap::new();
        let mut transactions: Vec<Vec<ItemId>> = Vec::new();

        for rating in kept {
            let num_users = user_index.len();
            let user = user_index
                .entry(rating.user_id.clone())
                .or_insert(num_users);

            if *user == transactions.len() {
                transactions.push(Vec::new());
            }

            let item = index[&rating.title];
            if !transactions[*user].contains(&item) {
                transactions[*user].push(item);
            }
        }

        for transaction in &mut transactions {
            transaction.sort();
        }

        Transactions {
            items: items,
            index: index,
            user_index: user_index,
            transactions: transactions,
        }
    }
}

impl From<Vec<Rating>> for Ratings {
    fn from(data: Vec<Rating>) -> Ratings {
        Ratings { ratings: data }
    }
}

/// Split ratings into random (train, test) collections.
pub fn train_test_split<R: Rng>(
    ratings: &mut Ratings,
    rng: &mut R,
    test_fraction: f32,
) -> (Ratings, Ratings) {
    ratings.shuffle(rng);

    let (test, train) = ratings.split_at((test_fraction * ratings.len() as f32) as usize);

    (train, test)
}

/// Split ratings into (train, test) collections so that each user's
/// records end up wholly on one side.
pub fn user_based_split<R: Rng>(
    ratings: &mut Ratings,
    rng: &mut R,
    test_fraction: f32,
) -> (Ratings, Ratings) {
    let denominator = 100_000;
    let train_cutoff = (test_fraction * denominator as f32) as u64;

    let range = Uniform::new(0, u64::max_value());
    let (key_0, key_1) = (range.sample(rng), range.sample(rng));

    let is_train = |x: &Rating| {
        let mut hasher = SipHasher::new_with_keys(key_0, key_1);
        hasher.write(x.user_id().as_bytes());
        hasher.finish() % denominator > train_cutoff
    };

    ratings.split_by(is_train)
}

/// A transaction snapshot: per-user unique item sets over a canonical
/// sorted vocabulary.
///
/// The transaction count is the normalizing denominator for every
/// support fraction computed downstream.
#[derive(Clone, Debug)]
pub struct Transactions {
    items: Vec<String>,
    index: HashMap<String, ItemId>,
    user_index: HashMap<String, usize>,
    transactions: Vec<Vec<ItemId>>,
}

impl Transactions {
    /// Build a snapshot from anonymous baskets of titles.
    ///
    /// Duplicate titles within a basket are collapsed. Baskets have no
    /// owning user, so `user_items` finds nothing on the result.
    pub fn from_baskets(baskets: &[Vec<String>]) -> Self {
        let vocabulary: BTreeSet<&str> = baskets
            .iter()
            .flat_map(|basket| basket.iter().map(|x| x.as_str()))
            .collect();
        let items: Vec<String> = vocabulary.into_iter().map(|x| x.to_owned()).collect();
        let index: HashMap<String, ItemId> = items
            .iter()
            .enumerate()
            .map(|(id, title)| (title.clone(), id))
            .collect();

        let transactions = baskets
            .iter()
            .map(|basket| {
                let ids: BTreeSet<ItemId> = basket.iter().map(|title| index[title]).collect();
                ids.into_iter().collect()
            })
            .collect();

        Transactions {
            items: items,
            index: index,
            user_index: HashMap::new(),
            transactions: transactions,
        }
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the snapshot holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Size of the item vocabulary.
    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// The canonical sorted vocabulary.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// The per-transaction item id sets, each sorted ascending.
    pub fn transactions(&self) -> &[Vec<ItemId>] {
        &self.transactions
    }

    /// The title of an item id.
    pub fn title(&self, item: ItemId) -> &str {
        &self.items[item]
    }

    /// The id of a title, if it occurs in the snapshot.
    pub fn item_id(&self, title: &str) -> Option<ItemId> {
        self.index.get(title).cloned()
    }

    /// Map item ids back to titles.
    pub fn titles(&self, ids: &[ItemId]) -> Vec<String> {
        ids.iter().map(|&id| self.items[id].clone()).collect()
    }

    /// The liked-item set of a known user, if present.
    pub fn user_items(&self, user_id: &str) -> Option<&[ItemId]> {
        self.user_index
            .get(user_id)
            .map(|&idx| self.transactions[idx].as_slice())
    }

    /// Encode the snapshot as a boolean occurrence matrix.
    pub fn to_matrix(&self) -> TransactionMatrix {
        TransactionMatrix::from(self)
    }
}

/// A dense boolean occurrence matrix: one row per transaction, one
/// column per vocabulary item.
#[derive(Clone, Debug)]
pub struct TransactionMatrix {
    matrix: Array2<bool>,
}

impl<'a> From<&'a Transactions> for TransactionMatrix {
    fn from(transactions: &Transactions) -> TransactionMatrix {
        let mut matrix =
            Array2::from_elem((transactions.len(), transactions.num_items()), false);

        for (row, transaction) in transactions.transactions().iter().enumerate() {
            for &item in transaction {
                matrix[[row, item]] = true;
            }
        }

        TransactionMatrix { matrix: matrix }
    }
}

impl TransactionMatrix {
    /// Number of transactions (rows).
    pub fn num_transactions(&self) -> usize {
        self.matrix.dim().0
    }

    /// Number of vocabulary items (columns).
    pub fn num_items(&self) -> usize {
        self.matrix.dim().1
    }

    /// Whether a transaction contains an item.
    pub fn contains(&self, row: usize, item: ItemId) -> bool {
        self.matrix[[row, item]]
    }

    /// The item ids present in a transaction, ascending.
    pub fn row_items(&self, row: usize) -> Vec<ItemId> {
        (0..self.num_items())
            .filter(|&item| self.matrix[[row, item]])
            .collect()
    }

    /// Number of transactions containing every item of `items`.
    pub fn support_count(&self, items: &[ItemId]) -> usize {
        (0..self.num_transactions())
            .filter(|&row| items.iter().all(|&item| self.matrix[[row, item]]))
            .count()
    }
}

/// Rank items by raw occurrence count across the snapshot.
///
/// Ties break by vocabulary order. Excluded titles are skipped; the
/// result is truncated to `top_n`. This is the transaction-frequency
/// flavor of the popularity fallback.
pub fn popular_items(transactions: &Transactions, top_n: usize, exclude: &[String]) -> Vec<String> {
    let mut counts = vec![0usize; transactions.num_items()];

    for transaction in transactions.transactions() {
        for &item in transaction {
            counts[item] += 1;
        }
    }

    let excluded: HashSet<&str> = exclude.iter().map(|x| x.as_str()).collect();

    let mut ranked: Vec<ItemId> = (0..transactions.num_items()).collect();
    ranked.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then_with(|| a.cmp(&b)));

    ranked
        .into_iter()
        .map(|item| transactions.title(item))
        .filter(|title| !excluded.contains(title))
        .take(top_n)
        .map(|title| title.to_owned())
        .collect()
}

/// The set of titles known to the system.
///
/// Used to validate user-supplied titles before recommending against
/// them, so that typos surface as errors instead of empty results.
#[derive(Clone, Debug)]
pub struct Catalog {
    titles: Vec<String>,
    index: HashSet<String>,
}

impl Catalog {
    /// Build a catalog from a list of titles.
    pub fn from_titles(titles: Vec<String>) -> Self {
        let index = titles.iter().cloned().collect();

        Catalog {
            titles: titles,
            index: index,
        }
    }

    /// Whether the catalog knows a title.
    pub fn contains(&self, title: &str) -> bool {
        self.index.contains(title)
    }

    /// The catalog titles, in input order.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Number of titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Whether the catalog holds no titles.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, XorShiftRng};

    use super::*;

    fn sample_ratings() -> Ratings {
        Ratings::from(vec![
            Rating::new("1", "Alien (1979)", 4.0),
            Rating::new("1", "Blade Runner (1982)", 5.0),
            Rating::new("1", "Gigli (2003)", 1.5),
            Rating::new("2", "Alien (1979)", 3.0),
            Rating::new("2", "Alien (1979)", 3.5),
            Rating::new("3", "Gigli (2003)", 2.0),
        ])
    }

    #[test]
    fn explicit_feedback_filters_low_ratings() {
        let transactions = sample_ratings().to_transactions(Feedback::Explicit);

        // User 3 only rated below the threshold and contributes nothing.
        assert_eq!(transactions.len(), 2);
        assert_eq!(
            transactions.items(),
            &["Alien (1979)".to_owned(), "Blade Runner (1982)".to_owned()]
        );
        assert_eq!(transactions.transactions()[0], vec![0, 1]);
        assert_eq!(transactions.transactions()[1], vec![0]);
    }

    #[test]
    fn implicit_feedback_keeps_everything() {
        let transactions = sample_ratings().to_transactions(Feedback::Implicit);

        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions.num_items(), 3);

        // Duplicate ratings of the same item collapse to one entry.
        let alien = transactions.item_id("Alien (1979)").unwrap();
        assert_eq!(transactions.transactions()[1], vec![alien]);
    }

    #[test]
    fn user_items_finds_known_users() {
        let transactions = sample_ratings().to_transactions(Feedback::Explicit);

        assert_eq!(transactions.user_items("1").unwrap(), &[0, 1]);
        assert_eq!(transactions.user_items("2").unwrap(), &[0]);
        assert!(transactions.user_items("no-such-user").is_none());
    }

    #[test]
    fn matrix_encodes_occurrences() {
        let transactions = sample_ratings().to_transactions(Feedback::Explicit);
        let matrix = transactions.to_matrix();

        assert_eq!(matrix.num_transactions(), 2);
        assert_eq!(matrix.num_items(), 2);
        assert!(matrix.contains(0, 0));
        assert!(matrix.contains(0, 1));
        assert!(!matrix.contains(1, 1));
        assert_eq!(matrix.row_items(0), vec![0, 1]);
        assert_eq!(matrix.support_count(&[0]), 2);
        assert_eq!(matrix.support_count(&[0, 1]), 1);
    }

    #[test]
    fn baskets_deduplicate_items() {
        let baskets = vec![
            vec!["B".to_owned(), "A".to_owned(), "A".to_owned()],
            vec!["C".to_owned()],
        ];
        let transactions = Transactions::from_baskets(&baskets);

        assert_eq!(transactions.items(), &["A", "B", "C"]);
        assert_eq!(transactions.transactions()[0], vec![0, 1]);
        assert_eq!(transactions.transactions()[1], vec![2]);
    }

    #[test]
    fn popular_items_ranks_by_frequency() {
        let baskets = vec![
            vec!["A".to_owned(), "B".to_owned()],
            vec!["B".to_owned()],
            vec!["B".to_owned(), "C".to_owned()],
            vec!["A".to_owned()],
        ];
        let transactions = Transactions::from_baskets(&baskets);

        assert_eq!(
            popular_items(&transactions, 3, &[]),
            vec!["B".to_owned(), "A".to_owned(), "C".to_owned()]
        );
        assert_eq!(
            popular_items(&transactions, 3, &["B".to_owned()]),
            vec!["A".to_owned(), "C".to_owned()]
        );
        assert_eq!(popular_items(&transactions, 1, &[]), vec!["B".to_owned()]);
    }

    #[test]
    fn catalog_membership() {
        let catalog = Catalog::from_titles(vec!["Alien (1979)".to_owned()]);

        assert!(catalog.contains("Alien (1979)"));
        assert!(!catalog.contains("Alien"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn user_based_split_keeps_users_whole() {
        let mut ratings = Ratings::from(
            (0..100)
                .map(|i| Rating::new(format!("user-{}", i % 20), format!("item-{}", i), 4.0))
                .collect::<Vec<_>>(),
        );

        let mut rng = XorShiftRng::from_seed([17; 16]);
        let (train, test) = user_based_split(&mut ratings, &mut rng, 0.3);

        assert_eq!(train.len() + test.len(), 100);

        let train_users: HashSet<&str> = train.data().iter().map(|x| x.user_id()).collect();
        let test_users: HashSet<&str> = test.data().iter().map(|x| x.user_id()).collect();

        assert!(train_users.is_disjoint(&test_users));
    }

    #[test]
    fn train_test_split_partitions_records() {
        let mut ratings = sample_ratings();
        let mut rng = XorShiftRng::from_seed([17; 16]);

        let (train, test) = train_test_split(&mut ratings, &mut rng, 0.5);

        assert_eq!(train.len(), 3);
        assert_eq!(test.len(), 3);
    }
}
