use crate::{
    ApiClient, ClientConfig, FilterConfig, Inventory, NamePattern, RestInventory,
    SelectorService, SessionToken, Tag, VmCandidate, VsphereConnection, VsphereError,
};
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

async fn create_inventory(mock_server: &MockServer, datacenter: Option<&str>) -> RestInventory {
    let url = Url::parse(&(mock_server.uri() + "/")).unwrap();
    let connection = VsphereConnection::new_unchecked(url, datacenter.map(str::to_string));
    let client = ApiClient::new(connection, ClientConfig::default()).unwrap();
    client
        .set_session(SessionToken::new("session-1234").unwrap())
        .await;
    RestInventory::new(client)
}

async fn mount_single_datacenter(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/vcenter/datacenter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "datacenter": "datacenter-1", "name": "DC0" }
        ])))
        .mount(mock_server)
        .await;
}

async fn mount_vm_list(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/vcenter/vm"))
        .and(query_param("datacenters", "datacenter-1"))
        .and(header("vmware-api-session-id", "session-1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "vm": "vm-11", "name": "web-1", "power_state": "POWERED_ON" },
            { "vm": "vm-12", "name": "web-2", "power_state": "POWERED_OFF" },
            { "vm": "vm-13", "name": "db-1", "power_state": "POWERED_ON" }
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_list_by_glob_filters_client_side() {
    let mock_server = MockServer::start().await;
    mount_single_datacenter(&mock_server).await;
    mount_vm_list(&mock_server).await;
    let inventory = create_inventory(&mock_server, None).await;

    let vms = inventory
        .list_by_glob(&NamePattern::new("web-*").unwrap())
        .await
        .unwrap();
    assert_eq!(
        vms,
        vec![
            VmCandidate::new("vm-11", "web-1"),
            VmCandidate::new("vm-12", "web-2")
        ]
    );

    let err = inventory
        .list_by_glob(&NamePattern::new("app-?").unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "vm 'app-?' not found");
}

#[tokio::test]
async fn test_datacenter_resolution() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vcenter/datacenter"))
        .and(query_param("names", "Lab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vcenter/datacenter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "datacenter": "datacenter-1", "name": "DC0" },
            { "datacenter": "datacenter-2", "name": "DC1" }
        ])))
        .mount(&mock_server)
        .await;

    let named = create_inventory(&mock_server, Some("Lab")).await;
    let err = named.list_by_glob(&NamePattern::default()).await.unwrap_err();
    assert_eq!(err.to_string(), "datacenter 'Lab' not found");

    let unnamed = create_inventory(&mock_server, None).await;
    let err = unnamed
        .list_by_glob(&NamePattern::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "default datacenter resolves to multiple instances, please specify"
    );
}

#[tokio::test]
async fn test_vm_config_properties() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sdk/vim25/8.0.1.0/VirtualMachine/vm-11/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_typeName": "VirtualMachineConfigInfo",
            "template": true,
            "createDate": "2024-02-10T09:30:00Z"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;
    let inventory = create_inventory(&mock_server, None).await;
    let vm = VmCandidate::new("vm-11", "web-1");

    assert!(inventory.is_template(&vm).await.unwrap());
    let created = inventory.creation_time(&vm).await.unwrap().unwrap();
    assert_eq!(created.to_rfc3339(), "2024-02-10T09:30:00+00:00");
}

#[tokio::test]
async fn test_attached_tags_and_categories() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cis/tagging/tag-association"))
        .and(query_param("action", "list-attached-tags"))
        .and(body_json(serde_json::json!({
            "object_id": { "id": "vm-12", "type": "VirtualMachine" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            "urn:vmomi:InventoryServiceTag:1:GLOBAL"
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cis/tagging/tag/urn:vmomi:InventoryServiceTag:1:GLOBAL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "urn:vmomi:InventoryServiceTag:1:GLOBAL",
            "name": "prod",
            "category_id": "urn:vmomi:InventoryServiceCategory:7:GLOBAL",
            "description": "",
            "used_by": []
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(
            "/api/cis/tagging/category/urn:vmomi:InventoryServiceCategory:7:GLOBAL",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "urn:vmomi:InventoryServiceCategory:7:GLOBAL",
            "name": "tier",
            "cardinality": "SINGLE"
        })))
        .mount(&mock_server)
        .await;
    let inventory = create_inventory(&mock_server, None).await;

    let tags = inventory
        .attached_tags(&VmCandidate::new("vm-12", "web-2"))
        .await
        .unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].name, "prod");
    assert_eq!(
        inventory
            .resolve_category_name(&tags[0].category_id)
            .await
            .unwrap(),
        "tier"
    );
}

#[tokio::test]
async fn test_host_members() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vcenter/host"))
        .and(query_param("names", "esx-01.lab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "host": "host-21", "name": "esx-01.lab", "connection_state": "CONNECTED" }
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vcenter/host"))
        .and(query_param("names", "esx-09.lab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vcenter/vm"))
        .and(query_param("hosts", "host-21"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "vm": "vm-13", "name": "db-1" }
        ])))
        .mount(&mock_server)
        .await;
    let inventory = create_inventory(&mock_server, None).await;

    let members = inventory.host_members("esx-01.lab").await.unwrap();
    assert_eq!(members, vec![VmCandidate::new("vm-13", "db-1")]);

    let err = inventory.host_members("esx-09.lab").await.unwrap_err();
    assert!(err.is_lookup());
    assert_eq!(err.to_string(), "host 'esx-09.lab' not found");
}

#[tokio::test]
async fn test_expired_session_is_wrapped_by_stage() {
    let mock_server = MockServer::start().await;
    mount_single_datacenter(&mock_server).await;
    mount_vm_list(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/sdk/vim25/8.0.1.0/VirtualMachine/vm-11/config"))
        .respond_with(ResponseTemplate::new(401).set_body_string("session expired"))
        .mount(&mock_server)
        .await;
    let inventory = create_inventory(&mock_server, None).await;

    let filters = FilterConfig::builder()
        .name("web-*")
        .template(true)
        .build()
        .unwrap();
    let err = SelectorService::new()
        .select(&filters, &inventory)
        .await
        .unwrap_err();

    let VsphereError::PropertyFetch { source, .. } = &err else {
        panic!("expected a stage error, got {err:?}");
    };
    assert!(matches!(**source, VsphereError::Authentication(_)));
}

#[tokio::test]
async fn test_select_over_rest() {
    let mock_server = MockServer::start().await;
    mount_single_datacenter(&mock_server).await;
    mount_vm_list(&mock_server).await;
    for (vm, tag) in [("vm-11", "tag-a"), ("vm-12", "tag-b")] {
        Mock::given(method("POST"))
            .and(path("/api/cis/tagging/tag-association"))
            .and(body_json(serde_json::json!({
                "object_id": { "id": vm, "type": "VirtualMachine" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([tag])))
            .mount(&mock_server)
            .await;
    }
    for (tag, name) in [("tag-a", "staging"), ("tag-b", "prod")] {
        Mock::given(method("GET"))
            .and(path(format!("/api/cis/tagging/tag/{}", tag)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": tag, "name": name, "category_id": "cat-1"
            })))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/cis/tagging/category/cat-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "env" })),
        )
        .mount(&mock_server)
        .await;
    let inventory = create_inventory(&mock_server, None).await;

    let filters = FilterConfig::builder()
        .name("web-*")
        .tag(Tag::new("prod", "env"))
        .build()
        .unwrap();
    let selected = SelectorService::new()
        .select(&filters, &inventory)
        .await
        .unwrap();
    assert_eq!(selected, "web-2");
}

#[tokio::test]
async fn test_oversized_vm_list_is_an_api_error() {
    let mock_server = MockServer::start().await;
    mount_single_datacenter(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/api/vcenter/vm"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error_type": "UNABLE_TO_ALLOCATE_RESOURCE",
            "messages": [{ "default_message": "Too many virtual machines. Add more filter criteria to reduce the number." }]
        })))
        .mount(&mock_server)
        .await;
    let inventory = create_inventory(&mock_server, None).await;

    let err = inventory
        .list_by_glob(&NamePattern::default())
        .await
        .unwrap_err();
    assert!(matches!(err, VsphereError::Api { status: 400, ref message } if message.contains("Too many")));
}
