//! Set-membership reconciliation against a mock Zoom API

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use tfplug::context::Context;
use tfplug::resource::{CreateResourceRequest, DeleteResourceRequest, UpdateResourceRequest};
use tfplug::{DynamicValue, ProviderResource, Resource};
use zoom::api::{Client, Outcome};
use zoom::resources::membership::members::{
    CallQueueMembersModel, MemberGroup, MemberReconciler, UserMemberModel,
};

use crate::common::configured_resource;

const MEMBERS_PATH: &str = "/phone/call_queues/cq-1/members";

fn user(id: &str, extension_id: &str) -> serde_json::Value {
    json!({"id": id, "name": id, "level": "user", "receive_call": true, "extension_id": extension_id})
}

async fn mock_members(server: &mut ServerGuard, members: serde_json::Value) -> Mock {
    server
        .mock("GET", MEMBERS_PATH)
        .match_query(Matcher::UrlEncoded("page_size".into(), "300".into()))
        .with_body(json!({"call_queue_members": members, "next_page_token": ""}).to_string())
        .create_async()
        .await
}

async fn mock_directory(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/phone/users")
        .match_query(Matcher::Any)
        .with_body(
            json!({
                "users": [
                    {"id": "u-a", "email": "a@example.com", "extension_id": "1"},
                    {"id": "u-b", "email": "b@example.com", "extension_id": "2"},
                    {"id": "u-c", "email": "c@example.com", "extension_id": "3"}
                ],
                "next_page_token": ""
            })
            .to_string(),
        )
        .create_async()
        .await
}

fn member(id: Option<&str>, email: Option<&str>) -> UserMemberModel {
    UserMemberModel {
        id: id.map(str::to_string),
        email: email.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn members_converge_by_id_and_email() {
    let mut server = Server::new_async().await;
    let client = Client::new(&server.url(), "token").unwrap();

    let members = mock_members(&mut server, json!([user("u-a", "1"), user("u-b", "2")])).await;
    let _directory = mock_directory(&mut server).await;
    let removed = server
        .mock("DELETE", "/phone/call_queues/cq-1/members/u-a")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let added = server
        .mock("POST", MEMBERS_PATH)
        .match_body(Matcher::Json(json!({
            "members": {"users": [{"email": "c@example.com"}]}
        })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let plan = CallQueueMembersModel {
        call_queue_id: "cq-1".to_string(),
        common_areas: None,
        users: Some(vec![
            member(Some("u-b"), None),
            member(None, Some("c@example.com")),
        ]),
    };

    let state = CallQueueMembersModel {
        call_queue_id: "cq-1".to_string(),
        common_areas: None,
        users: Some(vec![
            member(Some("u-a"), Some("a@example.com")),
            member(Some("u-b"), Some("b@example.com")),
        ]),
    };

    let reconciler = MemberReconciler::new(&client, MemberGroup::CallQueue);
    reconciler
        .sync(&Context::new(), &plan, Some(&state))
        .await
        .unwrap();

    removed.assert_async().await;
    added.assert_async().await;

    members.remove_async().await;
    let _after = mock_members(&mut server, json!([user("u-b", "2"), user("u-c", "3")])).await;

    let state = match reconciler.read(&Context::new(), &plan).await {
        Outcome::Found(state) => state,
        _ => panic!("call queue should exist"),
    };
    let ids: Vec<_> = state.users().iter().map(|u| u.id.as_deref().unwrap()).collect();
    let emails: Vec<_> = state
        .users()
        .iter()
        .map(|u| u.email.as_deref().unwrap())
        .collect();
    assert_eq!(ids, vec!["u-b", "u-c"]);
    assert_eq!(emails, vec!["b@example.com", "c@example.com"]);
    assert!(state.common_areas.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn converged_members_are_left_alone() {
    let mut server = Server::new_async().await;
    let client = Client::new(&server.url(), "token").unwrap();

    let _members = mock_members(&mut server, json!([user("u-a", "1"), user("u-b", "2")])).await;
    let _directory = mock_directory(&mut server).await;
    let writes = [
        server.mock("POST", Matcher::Any).expect(0).create_async().await,
        server.mock("DELETE", Matcher::Any).expect(0).create_async().await,
    ];

    let plan = CallQueueMembersModel {
        call_queue_id: "cq-1".to_string(),
        common_areas: None,
        users: Some(vec![
            member(None, Some("a@example.com")),
            member(Some("u-b"), None),
        ]),
    };

    let reconciler = MemberReconciler::new(&client, MemberGroup::CallQueue);
    for _ in 0..2 {
        reconciler
            .sync(&Context::new(), &plan, Some(&plan))
            .await
            .unwrap();
    }

    for mock in writes {
        mock.assert_async().await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn call_queue_members_resource_reports_resolved_state() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, "zoom_phone_call_queue_members").await;

    let _members = mock_members(
        &mut server,
        json!([
            user("u-a", "1"),
            {"id": "ca-1", "name": "Lobby", "level": "commonArea", "extension_id": "900"}
        ]),
    )
    .await;
    let _directory = mock_directory(&mut server).await;
    let added = server
        .mock("POST", MEMBERS_PATH)
        .expect(0)
        .create_async()
        .await;

    let response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "zoom_phone_call_queue_members".to_string(),
                planned_state: DynamicValue::new(json!({
                    "call_queue_id": "cq-1",
                    "users": [{"email": "a@example.com"}],
                    "common_areas": [{"id": "ca-1"}]
                })),
                config: DynamicValue::null(),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let state: CallQueueMembersModel = response.new_state.decode().unwrap();
    assert_eq!(state.users()[0].id.as_deref(), Some("u-a"));
    assert_eq!(state.common_areas()[0].name.as_deref(), Some("Lobby"));
    added.assert_async().await;
}

async fn update(
    resource: &dyn ProviderResource,
    type_name: &str,
    prior: serde_json::Value,
    plan: serde_json::Value,
) -> tfplug::resource::UpdateResourceResponse {
    resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: type_name.to_string(),
                prior_state: DynamicValue::new(prior),
                planned_state: DynamicValue::new(plan),
                config: DynamicValue::null(),
            },
        )
        .await
}

#[tokio::test(flavor = "multi_thread")]
async fn members_added_elsewhere_survive_repeated_updates() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, "zoom_phone_call_queue_members").await;

    let _members = mock_members(
        &mut server,
        json!([
            user("u-a", "1"),
            {"id": "ca-x", "name": "Lobby", "level": "commonArea", "extension_id": "900"}
        ]),
    )
    .await;
    let _directory = mock_directory(&mut server).await;
    let foreign = server
        .mock("DELETE", "/phone/call_queues/cq-1/members/ca-x")
        .expect(0)
        .create_async()
        .await;
    let added = server
        .mock("POST", MEMBERS_PATH)
        .expect(0)
        .create_async()
        .await;

    let plan = json!({"call_queue_id": "cq-1", "users": [{"id": "u-a"}]});
    let mut state = plan.clone();
    for _ in 0..2 {
        let response = update(
            resource.as_ref(),
            "zoom_phone_call_queue_members",
            state,
            plan.clone(),
        )
        .await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        state = response.new_state.value;
    }

    let state: CallQueueMembersModel = serde_json::from_value(state).unwrap();
    assert!(state.common_areas.is_none());
    assert_eq!(state.users()[0].email.as_deref(), Some("a@example.com"));
    foreign.assert_async().await;
    added.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn numbers_assigned_elsewhere_survive_repeated_updates() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, "zoom_phone_call_queue_phone_numbers").await;

    let _queue = server
        .mock("GET", "/phone/call_queues/cq-1")
        .with_body(
            json!({
                "id": "cq-1",
                "phone_numbers": [
                    {"id": "pn-1", "number": "+15550101", "source": "internal"},
                    {"id": "pn-x", "number": "+15550199", "source": "internal"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let foreign = server
        .mock("DELETE", "/phone/call_queues/cq-1/phone_numbers/pn-x")
        .expect(0)
        .create_async()
        .await;

    let plan = json!({"call_queue_id": "cq-1", "phone_numbers": [{"number": "+15550101"}]});
    let mut state = plan.clone();
    for _ in 0..2 {
        let response = update(
            resource.as_ref(),
            "zoom_phone_call_queue_phone_numbers",
            state,
            plan.clone(),
        )
        .await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        state = response.new_state.value;
    }

    assert_eq!(state["phone_numbers"].as_array().map(Vec::len), Some(1));
    assert_eq!(state["phone_numbers"][0]["id"], "pn-1");
    foreign.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn shared_line_group_members_keep_other_groups_members() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, "zoom_phone_shared_line_group_members").await;

    let _group = server
        .mock("GET", "/phone/shared_line_groups/slg-1")
        .with_body(
            json!({
                "id": "slg-1",
                "members": {
                    "users": [{"id": "u-b", "extension_id": "2"}],
                    "common_areas": [{"id": "ca-x", "name": "Lobby"}]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _directory = mock_directory(&mut server).await;
    let removed = server
        .mock("DELETE", "/phone/shared_line_groups/slg-1/members/u-b")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let foreign = server
        .mock("DELETE", "/phone/shared_line_groups/slg-1/members/ca-x")
        .expect(0)
        .create_async()
        .await;
    let added = server
        .mock("POST", "/phone/shared_line_groups/slg-1/members")
        .match_body(Matcher::Json(json!({
            "members": {"users": [{"email": "c@example.com"}]}
        })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let response = update(
        resource.as_ref(),
        "zoom_phone_shared_line_group_members",
        json!({"shared_line_group_id": "slg-1", "users": [{"id": "u-b", "email": "b@example.com"}]}),
        json!({"shared_line_group_id": "slg-1", "users": [{"email": "c@example.com"}]}),
    )
    .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    removed.assert_async().await;
    foreign.assert_async().await;
    added.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn shared_line_group_primary_outside_set_makes_no_calls() {
    let mut server = Server::new_async().await;
    let resource =
        configured_resource(&mut server, "zoom_phone_shared_line_group_phone_numbers").await;

    let reads = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "zoom_phone_shared_line_group_phone_numbers".to_string(),
                planned_state: DynamicValue::new(json!({
                    "shared_line_group_id": "slg-1",
                    "primary_number": "+15550199",
                    "phone_numbers": [{"number": "+15550101"}, {"id": "pn-2"}]
                })),
                config: DynamicValue::null(),
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert!(response.diagnostics[0]
        .detail
        .contains("primary number +15550199 must be included in phone_numbers"));
    reads.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn user_phone_numbers_on_missing_user_fail() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, "zoom_phone_user_phone_numbers").await;

    let _user = server
        .mock("GET", "/phone/users/u-404")
        .with_status(404)
        .with_body(json!({"code": 1001, "message": "User does not exist"}).to_string())
        .create_async()
        .await;

    let response = resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: "zoom_phone_user_phone_numbers".to_string(),
                planned_state: DynamicValue::new(json!({
                    "user_id": "u-404",
                    "phone_numbers": [{"number": "+15550101"}]
                })),
                config: DynamicValue::null(),
            },
        )
        .await;

    assert_eq!(response.diagnostics.len(), 1);
    assert_eq!(
        response.diagnostics[0].summary,
        "Error creating phone user phone numbers"
    );
    assert!(response.diagnostics[0].detail.contains("user u-404 not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn call_queue_phone_numbers_delete_on_vanished_queue_succeeds() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, "zoom_phone_call_queue_phone_numbers").await;

    let unassign = server
        .mock("DELETE", "/phone/call_queues/cq-1/phone_numbers")
        .with_status(404)
        .with_body(json!({"code": 404, "message": "Call queue does not exist"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let response = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: "zoom_phone_call_queue_phone_numbers".to_string(),
                prior_state: DynamicValue::new(json!({
                    "call_queue_id": "cq-1",
                    "phone_numbers": [{"id": "pn-1", "number": "+15550101"}]
                })),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    unassign.assert_async().await;
}
