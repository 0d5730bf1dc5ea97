//! Batch Statistic Properties
//!
//! The derived counts of a batch must agree with a recount of its tokens for
//! any token list, including the empty one.

use proptest::prelude::*;
use types::{ExtractedTokenBatch, TokenProfile};

prop_compose! {
    fn token_profile()
        (
            confidence in 0.0f64..=1.0,
            field_count in 0u32..=9,
            with_price in any::<bool>(),
            with_volume in any::<bool>(),
        ) -> TokenProfile {
        TokenProfile {
            price: with_price.then_some(0.00045),
            volume_24h: with_volume.then_some(22_000.0),
            confidence_score: confidence,
            field_count,
            ..Default::default()
        }
    }
}

proptest! {
    /// Property: counts never exceed the number of tokens
    #[test]
    fn counts_bounded_by_total(tokens in prop::collection::vec(token_profile(), 0..60)) {
        let batch = ExtractedTokenBatch::new(tokens, 0);

        prop_assert!(batch.high_confidence_count() <= batch.total_extracted());
        prop_assert!(batch.complete_profiles_count() <= batch.total_extracted());
        prop_assert_eq!(batch.total_extracted(), batch.tokens().len());
    }

    /// Property: counts match a fresh recount of the owned list
    #[test]
    fn counts_match_recount(tokens in prop::collection::vec(token_profile(), 0..60)) {
        let batch = ExtractedTokenBatch::new(tokens, 0);

        let high = batch.tokens().iter().filter(|t| t.confidence_score >= 0.7).count();
        let complete = batch
            .tokens()
            .iter()
            .filter(|t| t.field_count >= 5 && t.confidence_score >= 0.3)
            .count();

        prop_assert_eq!(batch.high_confidence_count(), high);
        prop_assert_eq!(batch.complete_profiles_count(), complete);
    }

    /// Property: get_top is sorted descending and never longer than requested
    #[test]
    fn get_top_is_ranked(
        tokens in prop::collection::vec(token_profile(), 0..60),
        n in 0usize..80,
    ) {
        let batch = ExtractedTokenBatch::new(tokens, 0);
        let top = batch.get_top(n);

        prop_assert!(top.len() <= n.min(batch.total_extracted()));
        for pair in top.windows(2) {
            let key = |t: &TokenProfile| (t.confidence_score, t.field_count);
            prop_assert!(key(pair[0]) >= key(pair[1]));
        }
    }

    /// Property: OHLC conversion only yields candles for priced, traded profiles
    #[test]
    fn ohlc_batch_requires_price_and_volume(tokens in prop::collection::vec(token_profile(), 0..40)) {
        let expected = tokens
            .iter()
            .filter(|t| t.price.is_some() && t.volume_24h.is_some())
            .count();
        let batch = ExtractedTokenBatch::new(tokens, 0);

        prop_assert_eq!(batch.to_ohlc_batch().len(), expected);
    }
}
