#[cfg(test)]
mod tests {
    use crate::stub::Stub;
    use crate::Error;
    use std::collections::BTreeMap;

    fn ns_name_stub() -> Stub<(String, String), Result<String, Error>> {
        Stub::new("get_thing")
    }

    #[test]
    fn test_exact_response_is_returned() {
        let stub = ns_name_stub();
        stub.returns(("default", "a"), Ok("first".to_string()));

        assert_eq!(
            stub.call(("default".to_string(), "a".to_string())),
            Ok("first".to_string())
        );
    }

    #[test]
    fn test_configured_error_is_returned_unchanged() {
        let stub = ns_name_stub();
        let err = Error::not_found("Thing", "default", "a");
        stub.returns(("default", "a"), Err(err.clone()));

        assert_eq!(stub.call(("default".into(), "a".into())), Err(err));
    }

    #[test]
    fn test_registering_again_replaces_response() {
        let stub = ns_name_stub();
        stub.returns(("default", "a"), Ok("old".to_string()));
        stub.returns(("default", "a"), Ok("new".to_string()));

        assert_eq!(stub.call(("default".into(), "a".into())), Ok("new".to_string()));
    }

    #[test]
    #[should_panic(expected = "unexpected call to get_thing")]
    fn test_unconfigured_call_panics() {
        let stub = ns_name_stub();
        stub.returns(("default", "a"), Ok("a".to_string()));

        let _ = stub.call(("default".into(), "b".into()));
    }

    #[test]
    fn test_try_call_reports_unconfigured_as_none() {
        let stub = ns_name_stub();
        assert!(!stub.is_configured());
        assert_eq!(stub.try_call(("x".into(), "y".into())), None);
        // Still recorded
        assert_eq!(stub.times_called(), 1);
    }

    #[test]
    fn test_exact_match_wins_over_responders_and_default() {
        let stub = ns_name_stub();
        stub.returns_by_default(Ok("default".to_string()));
        stub.returns_when(|(ns, _)| ns == "default", Ok("responder".to_string()));
        stub.returns(("default", "a"), Ok("exact".to_string()));

        assert_eq!(stub.call(("default".into(), "a".into())), Ok("exact".to_string()));
        assert_eq!(
            stub.call(("default".into(), "b".into())),
            Ok("responder".to_string())
        );
        assert_eq!(stub.call(("other".into(), "b".into())), Ok("default".to_string()));
    }

    #[test]
    fn test_first_matching_responder_wins() {
        let stub = ns_name_stub();
        stub.respond_with(|(_, name)| (name == "skip").then(|| Ok("skipped".to_string())));
        stub.respond_with(|(_, name)| Some(Ok(format!("computed-{name}"))));

        assert_eq!(
            stub.call(("ns".into(), "skip".into())),
            Ok("skipped".to_string())
        );
        assert_eq!(
            stub.call(("ns".into(), "x".into())),
            Ok("computed-x".to_string())
        );
    }

    #[test]
    fn test_calls_are_recorded_in_order() {
        let stub = ns_name_stub();
        stub.returns_by_default(Ok(String::new()));

        let _ = stub.call(("a".into(), "1".into()));
        let _ = stub.call(("b".into(), "2".into()));
        let _ = stub.call(("a".into(), "1".into()));

        assert_eq!(
            stub.calls(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string()),
            ]
        );
        stub.assert_called_times(3);
        assert!(stub.was_called_with(("b", "2")));
        assert!(!stub.was_called_with(("b", "1")));
    }

    #[test]
    #[should_panic(expected = "expected get_thing to be called 2 time(s), got 0")]
    fn test_assert_called_times_failure() {
        ns_name_stub().assert_called_times(2);
    }

    #[test]
    fn test_reset_clears_responses_and_calls() {
        let stub = ns_name_stub();
        stub.returns(("a", "b"), Ok("x".to_string()));
        let _ = stub.call(("a".into(), "b".into()));

        stub.reset();

        assert!(!stub.is_configured());
        assert_eq!(stub.times_called(), 0);
    }

    #[test]
    fn test_map_arguments_are_matched_by_value() {
        let stub: Stub<(String, BTreeMap<String, String>), usize> = Stub::new("get_services");
        let labels = BTreeMap::from([("app".to_string(), "reviews".to_string())]);
        stub.returns(("bookinfo", labels.clone()), 7);

        assert_eq!(stub.call(("bookinfo".to_string(), labels)), 7);
        assert_eq!(stub.try_call(("bookinfo".to_string(), BTreeMap::new())), None);
    }

    #[test]
    fn test_unit_arguments() {
        let stub: Stub<(), bool> = Stub::new("is_openshift");
        stub.returns((), false);
        assert!(!stub.call(()));
        assert_eq!(stub.operation(), "is_openshift");
    }

    #[test]
    fn test_debug_output_summarises_table() {
        let stub = ns_name_stub();
        stub.returns(("a", "b"), Ok(String::new()));
        let rendered = format!("{:?}", stub);
        assert!(rendered.contains("get_thing"));
        assert!(rendered.contains("responses: 1"));
    }
}
