#[cfg(test)]
mod tests {
    use crate::{ClientFactory, ClientFactoryMock, ClientMock, IstioClient};
    use std::sync::Arc;

    #[test]
    fn test_same_client_for_every_token() {
        let k8s: Arc<dyn IstioClient> = Arc::new(ClientMock::new());
        let factory = ClientFactoryMock::new(Arc::clone(&k8s));

        let first = factory.get_client("token-a").unwrap();
        let second = factory.get_client("").unwrap();
        let third = factory.get_client("token-a").unwrap();

        assert!(Arc::ptr_eq(&first, &k8s));
        assert!(Arc::ptr_eq(&second, &k8s));
        assert!(Arc::ptr_eq(&third, &first));
    }

    #[tokio::test]
    async fn test_handed_out_client_keeps_configuration() {
        let k8s = Arc::new(ClientMock::new());
        k8s.mock_service("bookinfo", "reviews");
        let factory = ClientFactoryMock::new(k8s.clone());

        let client = factory.get_client("user-token").unwrap();
        let svc = client.get_service("bookinfo", "reviews").await.unwrap();

        assert_eq!(svc.metadata.name.as_deref(), Some("reviews"));
        k8s.get_service.assert_called_times(1);
    }

    #[test]
    fn test_factory_as_trait_object() {
        let k8s = Arc::new(ClientMock::new());
        k8s.is_openshift.returns((), false);
        let factory: Box<dyn ClientFactory> = Box::new(ClientFactoryMock::new(k8s));

        assert!(!factory.get_client("token").unwrap().is_openshift());
    }
}
