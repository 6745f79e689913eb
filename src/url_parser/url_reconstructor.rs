use tracing::debug;
use url::form_urlencoded;

use crate::experiment::ExperimentRecord;

use super::url_processor::{split_query, strip_reserved};
use super::url_validator::ValidatedUrl;

/// Rebuilds a validated URL with the experiment parameters merged into its query
///
/// The base and every non-reserved query segment are copied verbatim from the
/// caller's input, keeping their order and multiplicity. The three reserved
/// parameters are form-encoded and appended last, exactly once each.
pub fn merge(validated: &ValidatedUrl, experiment: &ExperimentRecord) -> String {
    let kept = strip_reserved(split_query(&validated.query));

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(experiment.params());
    let experiment_query = serializer.finish();

    let mut merged = String::with_capacity(
        validated.base.len() + validated.query.len() + experiment_query.len() + 2,
    );
    merged.push_str(&validated.base);
    merged.push('?');
    for segment in &kept {
        merged.push_str(segment.raw);
        merged.push('&');
    }
    merged.push_str(&experiment_query);
    if let Some(fragment) = &validated.fragment {
        merged.push('#');
        merged.push_str(fragment);
    }

    debug!("Merged URL: {}", merged);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_parser::url_validator::validate;

    fn record() -> ExperimentRecord {
        ExperimentRecord::new("exp1", "varA", "v123").unwrap()
    }

    #[test]
    fn test_merge_without_query() {
        let validated = validate("example.com/offer").unwrap();
        assert_eq!(
            merge(&validated, &record()),
            "example.com/offer?experiment_name=exp1&variation_name=varA&visitor_id=v123"
        );
    }

    #[test]
    fn test_merge_appends_after_existing() {
        let validated = validate("https://example.com/offer?foo=bar").unwrap();
        assert_eq!(
            merge(&validated, &record()),
            "https://example.com/offer?foo=bar&experiment_name=exp1&variation_name=varA&visitor_id=v123"
        );
    }

    #[test]
    fn test_merge_replaces_reserved_in_place_of_old() {
        let validated =
            validate("example.com/offer?visitor_id=old&a=1&experiment_name=old&a=2").unwrap();
        assert_eq!(
            merge(&validated, &record()),
            "example.com/offer?a=1&a=2&experiment_name=exp1&variation_name=varA&visitor_id=v123"
        );
    }

    #[test]
    fn test_merge_encodes_values() {
        let experiment = ExperimentRecord::new("summer sale", "a&b", "id=7").unwrap();
        let validated = validate("example.com").unwrap();
        assert_eq!(
            merge(&validated, &experiment),
            "example.com?experiment_name=summer+sale&variation_name=a%26b&visitor_id=id%3D7"
        );
    }

    #[test]
    fn test_merge_keeps_non_utf8_values_intact() {
        let validated = validate("example.com/?id=%FF&sig=%C3%28&q=hello%20world").unwrap();
        assert_eq!(
            merge(&validated, &record()),
            "example.com/?id=%FF&sig=%C3%28&q=hello%20world&experiment_name=exp1&variation_name=varA&visitor_id=v123"
        );
    }

    #[test]
    fn test_merge_keeps_fragment_last() {
        let validated = validate("https://example.com/docs?page=2#intro").unwrap();
        assert_eq!(
            merge(&validated, &record()),
            "https://example.com/docs?page=2&experiment_name=exp1&variation_name=varA&visitor_id=v123#intro"
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let first = merge(&validate("example.com/p?x=1").unwrap(), &record());
        let second = merge(&validate(&first).unwrap(), &record());
        assert_eq!(first, second);
    }
}
