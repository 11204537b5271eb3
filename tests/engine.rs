//! End-to-end engine behavior: indexing, ranking, filtering, removal.

use scour::{DocumentStatus, ExecutionPolicy, SearchEngine, SearchError, MAX_RESULT_COUNT};

fn active(engine: &mut SearchEngine, id: i32, text: &str, ratings: &[i32]) {
    engine
        .add_document(id, text, DocumentStatus::Active, ratings)
        .unwrap();
}

#[test]
fn stop_words_are_excluded_from_indexing() {
    let content = "cat in the city";
    let ratings = [1, 2, 3];

    // Without stop words the query finds the document.
    let mut engine = SearchEngine::new();
    active(&mut engine, 42, content, &ratings);
    let found = engine.find_top_documents("in").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 42);

    // With "in the" configured, the same query finds nothing.
    let mut engine = SearchEngine::with_stop_words_text("in the").unwrap();
    engine
        .add_document(42, content, DocumentStatus::Active, &ratings)
        .unwrap();
    assert!(engine.find_top_documents("in").unwrap().is_empty());
}

#[test]
fn minus_words_exclude_documents() {
    let mut engine = SearchEngine::new();
    active(&mut engine, 0, "next let set now how row coll", &[1, 2, 3, 4]);
    active(&mut engine, 1, "lot not root bool cat set get", &[2, 3, 4, 5]);

    let found = engine.find_top_documents("set -lot").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 0);
}

#[test]
fn minus_word_results_rank_by_relevance_then_rating() {
    let mut engine = SearchEngine::new();
    active(&mut engine, 0, "next let set now how row coll", &[1, 2, 3, 4]);
    active(&mut engine, 1, "lot not root bool cat set get", &[2, 3, 4, 5]);
    active(&mut engine, 15, "see room in best dog of bag set", &[2, 3, 4, 5]);

    let found = engine.find_top_documents("set -lot").unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, 15);
    assert_eq!(found[1].id, 0);
}

#[test]
fn match_document_returns_occurring_plus_words() {
    let mut engine = SearchEngine::new();
    active(&mut engine, 15, "see room in best dog of bag set", &[2, 3, 4, 5]);

    let matched = engine.match_document("room best bag set", 15).unwrap();
    assert_eq!(matched.words, ["bag", "best", "room", "set"]);
    assert_eq!(matched.status, DocumentStatus::Active);
}

#[test]
fn match_document_minus_word_wins() {
    let mut engine = SearchEngine::new();
    active(&mut engine, 15, "see room in best dog of bag set", &[2, 3, 4, 5]);

    let matched = engine.match_document("room best bag -set", 15).unwrap();
    assert!(matched.words.is_empty());
}

#[test]
fn ratings_are_truncated_means() {
    let mut engine = SearchEngine::new();
    active(&mut engine, 0, "next let set now how next row coll", &[1, 2, 3, 4]);
    active(&mut engine, 1, "lot not root bool cat set get next", &[1, 2, 3, 4, 5]);
    active(
        &mut engine,
        15,
        "see room in best dog of bag bag bag bag bag bag",
        &[1, 2, 5, 6, 7, 8],
    );

    let found = engine.find_top_documents("next set bag").unwrap();
    assert_eq!(found.len(), 3);
    assert_eq!(found[0].id, 15);
    assert_eq!(found[0].rating, (1 + 2 + 5 + 6 + 7 + 8) / 6);
    assert_eq!(found[1].id, 0);
    assert_eq!(found[1].rating, (1 + 2 + 3 + 4) / 4);
}

#[test]
fn relevance_values_and_ordering() {
    let mut engine = SearchEngine::new();
    active(&mut engine, 0, "a b c", &[1, 2, 3, 4]);
    active(&mut engine, 1, "b c b", &[1, 2, 3, 4, 5]);
    active(&mut engine, 2, "d e f", &[1, 2, 5, 6, 7, 8]);
    active(&mut engine, 3, "q y b", &[3, 5, 4]);

    let found = engine.find_top_documents("b").unwrap();
    let idf = (4.0_f64 / 3.0).ln();

    assert_eq!(found[0].id, 1);
    assert!((found[0].relevance - idf * (2.0 / 3.0)).abs() < 1e-12);

    // Documents 0 and 3 tie on relevance; document 3 has the higher rating.
    assert_eq!(found[1].id, 3);
    assert!((found[1].relevance - idf * (1.0 / 3.0)).abs() < 1e-12);
    assert_eq!(found[2].id, 0);
    assert!((found[2].relevance - idf * (1.0 / 3.0)).abs() < 1e-12);
}

#[test]
fn result_count_is_capped() {
    let mut engine = SearchEngine::new();
    for (id, text) in [
        "a b c", "e a g", "r t a", "g a j", "a d x", "a n m", "a p y", "a l u",
    ]
    .iter()
    .enumerate()
    {
        active(&mut engine, id as i32, text, &[1, 2]);
    }
    assert_eq!(
        engine.find_top_documents("a").unwrap().len(),
        MAX_RESULT_COUNT
    );
}

#[test]
fn search_filters_by_status() {
    let mut engine = SearchEngine::new();
    for (id, status) in [
        (0, DocumentStatus::Banned),
        (1, DocumentStatus::Removed),
        (15, DocumentStatus::Active),
        (2, DocumentStatus::Banned),
        (3, DocumentStatus::Removed),
        (6, DocumentStatus::Active),
    ] {
        engine.add_document(id, "a", status, &[]).unwrap();
    }

    let policy = ExecutionPolicy::Sequential;
    for (status, expected) in [
        (DocumentStatus::Active, 2),
        (DocumentStatus::Removed, 2),
        (DocumentStatus::Banned, 2),
    ] {
        assert_eq!(
            engine
                .find_top_documents_with_status(policy, "a", status)
                .unwrap()
                .len(),
            expected
        );
    }
}

#[test]
fn search_filters_by_predicate() {
    let mut engine = SearchEngine::new();
    let texts = [
        (0, "next let set now how next row coll", DocumentStatus::Banned, vec![1, 2, 3, 4]),
        (1, "lot not root bool cat set get next", DocumentStatus::Removed, vec![1, 2, 3, 4, 5]),
        (15, "see room in best dog of bag bag bag bag bag bag", DocumentStatus::Active, vec![1, 2, 5, 6, 7, 8]),
        (2, "next let set now how next row coll", DocumentStatus::Banned, vec![1, 2, 3, 4]),
        (3, "lot not root bool cat set get next", DocumentStatus::Removed, vec![1, 2, 3, 4, 5]),
        (6, "see room in best dog of bag bag bag bag bag bag", DocumentStatus::Active, vec![1, 2, 5, 6, 7, 8]),
    ];
    for (id, text, status, ratings) in texts {
        engine.add_document(id, text, status, &ratings).unwrap();
    }

    let policy = ExecutionPolicy::Sequential;

    let even_ids = engine
        .find_top_documents_by(policy, "next set bag", |id, _, _| id % 2 == 0)
        .unwrap();
    assert_eq!(even_ids.len(), 3);
    assert_eq!(even_ids[0].id, 6);

    let odd_ids = engine
        .find_top_documents_by(policy, "next set bag", |id, _, _| id % 2 == 1)
        .unwrap();
    assert_eq!(odd_ids.len(), 3);
    assert_eq!(odd_ids[0].id, 15);

    let even_ratings = engine
        .find_top_documents_by(policy, "next set bag", |_, _, rating| rating % 2 == 0)
        .unwrap();
    assert_eq!(even_ratings.len(), 4);
    assert_eq!(even_ratings[2].id, 0);

    let odd_ratings = engine
        .find_top_documents_by(policy, "next set bag", |_, _, rating| rating % 2 == 1)
        .unwrap();
    assert_eq!(odd_ratings.len(), 2);
    assert_eq!(odd_ratings[1].id, 3);
}

#[test]
fn removed_documents_stop_matching() {
    let mut engine = SearchEngine::new();
    active(&mut engine, 0, "unique marker words", &[1]);
    active(&mut engine, 1, "other content entirely", &[1]);

    engine.remove_document(0);
    assert!(engine.find_top_documents("marker").unwrap().is_empty());
    assert!(engine.word_frequencies(0).is_empty());
    assert_eq!(engine.document_count(), 1);
    assert_eq!(engine.document_ids().collect::<Vec<_>>(), [1]);
}

#[test]
fn add_document_error_paths() {
    let mut engine = SearchEngine::new();
    assert_eq!(
        engine.add_document(-2, "cat", DocumentStatus::Active, &[]),
        Err(SearchError::InvalidDocument(-2))
    );
    engine.add_document(1, "cat", DocumentStatus::Active, &[]).unwrap();
    assert_eq!(
        engine.add_document(1, "cat", DocumentStatus::Active, &[]),
        Err(SearchError::InvalidDocument(1))
    );
    assert!(matches!(
        engine.add_document(2, "bad\u{1}word", DocumentStatus::Active, &[]),
        Err(SearchError::InvalidWord(_))
    ));
}

#[test]
fn query_error_paths() {
    let mut engine = SearchEngine::new();
    active(&mut engine, 0, "cat", &[]);
    for raw in ["-", "cat -", "--cat", "cat --dog", "ca\u{1}t"] {
        assert!(
            matches!(
                engine.find_top_documents(raw),
                Err(SearchError::InvalidQueryTerm(_))
            ),
            "expected {raw:?} to be rejected"
        );
    }
}

#[test]
fn empty_ratings_yield_rating_zero() {
    let mut engine = SearchEngine::new();
    active(&mut engine, 0, "cat", &[]);
    let found = engine.find_top_documents("cat").unwrap();
    assert_eq!(found[0].rating, 0);
}
