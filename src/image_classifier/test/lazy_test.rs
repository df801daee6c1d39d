use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::image_classifier::interface::ImageClassifier;
use crate::image_classifier::lazy::LazyClassifier;
use crate::image_classifier::test::fixture::Fixture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_lazy_classifier_builds_on_first_use_only() {
    let f = Fixture::new();
    let built = Arc::new(AtomicUsize::new(0));
    let logger = f.logger.clone();
    let counter = built.clone();

    let lazy = LazyClassifier::new(f.logger.clone(), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let classifier: Arc<dyn ImageClassifier + Send + Sync> =
            Arc::new(ImageClassifierFake::new(logger.clone()));
        Ok(classifier)
    });

    assert!(!lazy.is_initialized());
    assert_eq!(built.load(Ordering::SeqCst), 0);

    let first = lazy.get();
    let second = lazy.get();

    assert!(lazy.is_initialized());
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_lazy_classifier_builds_once_across_threads() {
    let f = Fixture::new();
    let built = Arc::new(AtomicUsize::new(0));
    let logger = f.logger.clone();
    let counter = built.clone();

    let lazy = Arc::new(LazyClassifier::new(f.logger.clone(), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let classifier: Arc<dyn ImageClassifier + Send + Sync> =
            Arc::new(ImageClassifierFake::new(logger.clone()));
        Ok(classifier)
    }));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let lazy = lazy.clone();
            std::thread::spawn(move || {
                lazy.get();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
#[should_panic(expected = "App failed to create an image classifier model instance")]
fn test_lazy_classifier_panics_when_construction_fails() {
    let f = Fixture::new();
    let lazy = LazyClassifier::new(f.logger.clone(), || Err("model artifact missing".into()));

    lazy.get();
}
