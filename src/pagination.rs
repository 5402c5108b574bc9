//! Pagination accumulator for cursor-based listing APIs.
//!
//! IAM `ListUsers` (and the other AWS list calls) return results in pages:
//! a truncation flag, an opaque continuation marker, and one or more
//! record-list fields. This module drains such a listing into a single
//! combined result, one field at a time, in page-arrival order.

use std::collections::BTreeMap;
use std::future::Future;
use thiserror::Error;

/// One page of a paginated listing.
///
/// `fields` holds only the record-list members of the response; the
/// truncation flag and continuation marker live in the envelope and never
/// appear in the accumulated result.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Whether more pages remain after this one.
    pub is_truncated: bool,
    /// Continuation marker for the next fetch. Present iff `is_truncated`.
    pub marker: Option<String>,
    /// Record-list fields keyed by field name.
    pub fields: BTreeMap<String, Vec<T>>,
}

/// Accumulated listing: field name to all records collected for that field,
/// across every page, in arrival order.
pub type Listing<T> = BTreeMap<String, Vec<T>>;

/// Failures while draining a paginated listing.
#[derive(Debug, Error)]
pub enum AccumulateError<E> {
    /// The page fetch itself failed. Propagated verbatim, no retry.
    #[error("page fetch failed: {0}")]
    Fetch(E),

    /// A later page did not carry a field the first page had.
    #[error("page {page} is missing field {field:?} present on the first page")]
    MissingField { page: usize, field: String },

    /// A page reported truncation but carried no continuation marker.
    #[error("page {page} reported truncation but carried no continuation marker")]
    MissingMarker { page: usize },
}

/// Drain a paginated listing into one combined [`Listing`].
///
/// `fetch_page` is called with `None` for the first page, then with each
/// page's continuation marker until a page reports `is_truncated == false`.
/// The first page's field set is authoritative: every one of its fields is
/// required on every later page, and fields that only appear later are
/// ignored. Records keep their page order and their order within a page.
///
/// Fetches are strictly sequential; each call is awaited before the next.
pub async fn accumulate<T, E, F, Fut>(mut fetch_page: F) -> Result<Listing<T>, AccumulateError<E>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    let mut page = fetch_page(None).await.map_err(AccumulateError::Fetch)?;
    let mut page_no = 1usize;

    let mut listing: Listing<T> = page
        .fields
        .keys()
        .map(|field| (field.clone(), Vec::new()))
        .collect();

    loop {
        for (field, collected) in listing.iter_mut() {
            let records = page
                .fields
                .remove(field)
                .ok_or_else(|| AccumulateError::MissingField {
                    page: page_no,
                    field: field.clone(),
                })?;
            collected.extend(records);
        }

        if !page.is_truncated {
            return Ok(listing);
        }

        let marker = page
            .marker
            .take()
            .ok_or(AccumulateError::MissingMarker { page: page_no })?;

        page = fetch_page(Some(marker))
            .await
            .map_err(AccumulateError::Fetch)?;
        page_no += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::future::ready;

    fn page(truncated: bool, marker: Option<&str>, fields: &[(&str, &[i32])]) -> Page<i32> {
        Page {
            is_truncated: truncated,
            marker: marker.map(String::from),
            fields: fields
                .iter()
                .map(|(name, records)| (name.to_string(), records.to_vec()))
                .collect(),
        }
    }

    async fn replay(pages: Vec<Page<i32>>) -> Result<Listing<i32>, AccumulateError<Infallible>> {
        let mut pages = pages.into_iter();
        accumulate(move |_marker| ready(Ok(pages.next().expect("fetched past the last page"))))
            .await
    }

    #[tokio::test]
    async fn test_single_page() {
        let result = replay(vec![page(false, None, &[("Users", &[1, 2, 3])])])
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result["Users"], vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_multi_page_concatenation() {
        let pages = vec![
            page(true, Some("m1"), &[("Users", &[1, 2]), ("Tags", &[10])]),
            page(true, Some("m2"), &[("Users", &[3]), ("Tags", &[20, 30])]),
            page(false, None, &[("Users", &[4, 5]), ("Tags", &[])]),
        ];

        let result = replay(pages).await.unwrap();

        assert_eq!(result["Users"], vec![1, 2, 3, 4, 5]);
        assert_eq!(result["Tags"], vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_result_holds_only_record_fields() {
        let result = replay(vec![page(false, None, &[("Users", &[1])])])
            .await
            .unwrap();

        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Users"]);
    }

    #[tokio::test]
    async fn test_markers_follow_pages_in_order() {
        let seen = RefCell::new(Vec::new());
        let mut pages = vec![
            page(true, Some("m1"), &[("Users", &[1])]),
            page(true, Some("m2"), &[("Users", &[2])]),
            page(false, None, &[("Users", &[3])]),
        ]
        .into_iter();

        let result = accumulate(|marker| {
            seen.borrow_mut().push(marker);
            ready(Ok::<_, Infallible>(pages.next().unwrap()))
        })
        .await
        .unwrap();

        assert_eq!(result["Users"], vec![1, 2, 3]);
        assert_eq!(
            *seen.borrow(),
            vec![None, Some("m1".to_string()), Some("m2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_deterministic_replay_is_idempotent() {
        let pages = vec![
            page(true, Some("m1"), &[("Users", &[1, 2])]),
            page(false, None, &[("Users", &[3])]),
        ];

        let first = replay(pages.clone()).await.unwrap();
        let second = replay(pages).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_later_page_missing_field_is_an_error() {
        let pages = vec![
            page(true, Some("m1"), &[("Users", &[1]), ("Tags", &[10])]),
            page(false, None, &[("Users", &[2])]),
        ];

        let err = replay(pages).await.unwrap_err();
        assert!(matches!(
            err,
            AccumulateError::MissingField { page: 2, ref field } if field == "Tags"
        ));
    }

    #[tokio::test]
    async fn test_extra_field_on_later_page_is_ignored() {
        let pages = vec![
            page(true, Some("m1"), &[("Users", &[1])]),
            page(false, None, &[("Users", &[2]), ("Surprise", &[99])]),
        ];

        let result = replay(pages).await.unwrap();

        assert_eq!(result["Users"], vec![1, 2]);
        assert!(!result.contains_key("Surprise"));
    }

    #[tokio::test]
    async fn test_truncated_page_without_marker_is_an_error() {
        let pages = vec![page(true, None, &[("Users", &[1])])];

        let err = replay(pages).await.unwrap_err();
        assert!(matches!(err, AccumulateError::MissingMarker { page: 1 }));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let err = accumulate(|_marker: Option<String>| {
            ready(Err::<Page<i32>, _>("throttled".to_string()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, AccumulateError::Fetch(ref msg) if msg == "throttled"));
    }
}
