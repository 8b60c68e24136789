use super::*;

#[test]
fn test_page_request_default() {
    let request = PageRequest::default();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, DEFAULT_PER_PAGE);
}

#[test]
fn test_page_request_clamps() {
    let request = PageRequest::new(Some(0), Some(10_000));
    assert_eq!(
        request,
        PageRequest {
            page: 1,
            per_page: MAX_PER_PAGE,
        }
    );

    let request = PageRequest::new(None, Some(0));
    assert_eq!(request.per_page, 1);
}

#[test]
fn test_paginate_slices_requested_page() {
    let items: Vec<i32> = (1..=25).collect();
    let response = PageResponse::paginate(items, PageRequest::new(Some(3), Some(10)));

    assert_eq!(response.data, vec![21, 22, 23, 24, 25]);
    assert_eq!(
        response.meta,
        PageMeta {
            page: 3,
            per_page: 10,
            total: 25,
            total_pages: 3,
        }
    );
}

#[test]
fn test_paginate_first_page() {
    let items: Vec<i32> = (1..=25).collect();
    let response = PageResponse::paginate(items, PageRequest::new(None, Some(10)));

    assert_eq!(response.data, (1..=10).collect::<Vec<_>>());
}

#[test]
fn test_paginate_empty_list_has_one_page() {
    let response = PageResponse::paginate(Vec::<i32>::new(), PageRequest::default());

    assert!(response.data.is_empty());
    assert_eq!(response.meta.total, 0);
    assert_eq!(response.meta.total_pages, 1);
}

#[test]
fn test_paginate_past_the_end_is_empty() {
    let items: Vec<i32> = (1..=5).collect();
    let response = PageResponse::paginate(items, PageRequest::new(Some(4), Some(5)));

    assert!(response.data.is_empty());
    assert_eq!(response.meta.total, 5);
}
