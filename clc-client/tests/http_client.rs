use clc_client::{
    ClcClient,
    Datacenter,
    FailureKind,
    Provider,
    Scope,
    Server,
    ServerId,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::{
    matchers::{
        body_json,
        header,
        method,
        path,
        query_param,
    },
    Mock,
    MockServer,
    ResponseTemplate,
};

async fn client_for(server: &MockServer) -> ClcClient {
    let base_url = Url::parse(&format!("{}/v2/", server.uri())).unwrap();
    ClcClient::new(base_url).with_bearer_token("t0k3n")
}

#[tokio::test]
async fn login_returns_account_alias_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/authentication/login"))
        .and(body_json(json!({ "username": "jdoe", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userName": "jdoe",
            "accountAlias": "ACME",
            "locationAlias": "WA1",
            "roles": ["ServerAdmin"],
            "bearerToken": "fresh-token"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/datacenters/ACME"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let base_url = Url::parse(&format!("{}/v2", server.uri())).unwrap();
    let (client, login) = ClcClient::new(base_url).login("jdoe", "s3cret").await.unwrap();

    assert_eq!(login.account_alias, Scope::from("ACME"));
    assert!(client.is_authenticated());
    assert!(client.list_datacenters(&login.account_alias).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_login_is_an_api_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/authentication/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "message": "invalid credentials" })))
        .mount(&server)
        .await;

    let base_url = Url::parse(&format!("{}/v2/", server.uri())).unwrap();
    let err = ClcClient::new(base_url).login("jdoe", "wrong").await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::ApiFailure);
    assert!(err.to_string().contains("invalid credentials"), "{err}");
}

#[tokio::test]
async fn lists_datacenters_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/datacenters/ACME"))
        .and(header("authorization", "Bearer t0k3n"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "WA1", "name": "US West (Seattle)", "links": [] },
            { "id": "UC1", "name": "US West (Santa Clara)", "links": [] }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let datacenters = client.list_datacenters(&Scope::from("ACME")).await.unwrap();
    assert_eq!(
        datacenters,
        vec![
            Datacenter::new("WA1", "US West (Seattle)"),
            Datacenter::new("UC1", "US West (Santa Clara)"),
        ]
    );
}

#[tokio::test]
async fn top_groups_follow_the_root_group_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/datacenters/ACME/WA1"))
        .and(query_param("groupLinks", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "WA1",
            "name": "US West (Seattle)",
            "links": [
                { "rel": "self", "href": "/v2/datacenters/ACME/WA1" },
                { "rel": "group", "href": "/v2/groups/ACME/root-wa1", "id": "root-wa1", "name": "WA1 Hardware" }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/groups/ACME/root-wa1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "root-wa1",
            "name": "WA1 Hardware",
            "type": "default",
            "groups": [{
                "id": "g-web",
                "name": "webservers",
                "type": "default",
                "groups": [],
                "links": [
                    { "rel": "server", "href": "/v2/servers/ACME/WA1ABC01", "id": "WA1ABC01" },
                    { "rel": "server", "href": "/v2/servers/ACME/WA1ABC02", "id": "WA1ABC02" }
                ]
            }],
            "links": []
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let scope = Scope::from("ACME");
    let groups = client
        .list_top_groups(&scope, &Datacenter::new("WA1", "US West (Seattle)"))
        .await
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "webservers");
    assert!(client.list_subgroups(&scope, &groups[0]).await.unwrap().is_empty());
    assert_eq!(
        client.list_servers(&scope, &groups[0]).await.unwrap(),
        vec![ServerId::from("WA1ABC01"), ServerId::from("WA1ABC02")]
    );
}

#[tokio::test]
async fn datacenter_without_root_group_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/datacenters/ACME/NY1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "NY1", "links": [] })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .list_top_groups(&Scope::from("ACME"), &Datacenter::new("NY1", ""))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Provider);
}

#[tokio::test]
async fn server_detail_round_trips_into_a_typed_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/servers/ACME/WA1ABC01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "WA1ABC01",
            "name": "WA1ABC01",
            "groupId": "g-web",
            "locationId": "WA1",
            "status": "active",
            "details": {
                "ipAddresses": [{ "internal": "10.80.1.11" }],
                "powerState": "started"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let id = ServerId::from("WA1ABC01");
    let record = client.fetch_server_detail(&Scope::from("ACME"), &id).await.unwrap();
    assert_eq!(record.as_value()["details"]["powerState"], json!("started"));

    let typed = Server::from_record(id, record).unwrap();
    assert_eq!(typed.primary_internal_address().unwrap(), Some("10.80.1.11"));
}

#[tokio::test]
async fn server_detail_errors_are_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/servers/ACME/GONE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "server not found" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/servers/ACME/GARBLED"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let scope = Scope::from("ACME");

    let err = client
        .fetch_server_detail(&scope, &ServerId::from("GONE"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::ApiFailure);

    let err = client
        .fetch_server_detail(&scope, &ServerId::from("GARBLED"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::MalformedRecord);
}
