//! Call handling profiles driven through the provider's resources

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use tfplug::context::Context;
use tfplug::resource::{DeleteResourceRequest, UpdateResourceRequest};
use tfplug::{AttributePath, DynamicValue, ProviderResource, Resource};

use crate::common::configured_resource;

const BUSINESS_HOURS: &str = "zoom_phone_call_handling_business_hours";
const HOLIDAY_HOURS: &str = "zoom_phone_call_handling_holiday_hours";
const SETTINGS_PATH: &str = "/phone/extension/ext-1/call_handling/settings";
const BUSINESS_PATH: &str = "/phone/extension/ext-1/call_handling/settings/business_hours";

fn business_settings(forwarding: serde_json::Value) -> String {
    json!({
        "business_hours": [
            {"sub_setting_type": "custom_hours", "settings": {"type": 1}},
            {"sub_setting_type": "call_handling", "settings": {"call_not_answer_action": 1}},
            {"sub_setting_type": "call_forwarding", "settings": {
                "require_press_1_before_connecting": false,
                "call_forwarding_settings": forwarding
            }}
        ]
    })
    .to_string()
}

fn platform_entry() -> serde_json::Value {
    json!({"id": "cf-mobile", "description": "Zoom Mobile Apps", "enable": true})
}

async fn mock_patch(server: &mut ServerGuard, sub_setting_type: &str) -> Mock {
    server
        .mock("PATCH", BUSINESS_PATH)
        .match_body(Matcher::PartialJson(
            json!({"sub_setting_type": sub_setting_type}),
        ))
        .with_status(204)
        .create_async()
        .await
}

/// Custom hours and call handling PATCHes, sent by every business hours sync
async fn mock_leading_patches(server: &mut ServerGuard) -> (Mock, Mock) {
    let custom_hours = mock_patch(server, "custom_hours").await;
    let call_handling = mock_patch(server, "call_handling").await;
    (custom_hours, call_handling)
}

async fn mock_forwarding_delete(server: &mut ServerGuard, id: &str, hits: usize) -> Mock {
    server
        .mock("DELETE", BUSINESS_PATH)
        .match_query(Matcher::UrlEncoded("call_forwarding_id".into(), id.into()))
        .with_status(204)
        .expect(hits)
        .create_async()
        .await
}

async fn update(
    resource: &dyn ProviderResource,
    prior: serde_json::Value,
    plan: serde_json::Value,
) -> tfplug::resource::UpdateResourceResponse {
    resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: BUSINESS_HOURS.to_string(),
                prior_state: DynamicValue::new(prior),
                planned_state: DynamicValue::new(plan),
                config: DynamicValue::null(),
            },
        )
        .await
}

#[tokio::test(flavor = "multi_thread")]
async fn forwarding_update_toggles_platform_entries_only() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, BUSINESS_HOURS).await;

    let _get = server
        .mock("GET", SETTINGS_PATH)
        .with_body(business_settings(json!([
            platform_entry(),
            {"id": "cf-1", "description": "desk", "enable": true, "phone_number": "+15550101"},
            {"id": "cf-2", "description": "old", "enable": true, "phone_number": "+15550109"}
        ])))
        .create_async()
        .await;
    let (_custom_hours, call_handling) = mock_leading_patches(&mut server).await;
    let forwarding = server
        .mock("PATCH", BUSINESS_PATH)
        .match_body(Matcher::Json(json!({
            "sub_setting_type": "call_forwarding",
            "settings": {
                "call_forwarding_settings": [
                    {"id": "cf-mobile", "enable": false},
                    {"id": "cf-1", "description": "desk", "enable": true, "phone_number": "+15550101"}
                ]
            }
        })))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let created = server
        .mock("POST", BUSINESS_PATH)
        .match_body(Matcher::Json(json!({
            "sub_setting_type": "call_forwarding",
            "settings": {"description": "cell", "phone_number": "+15550102"}
        })))
        .with_status(201)
        .with_body(json!({"call_forwarding_id": "cf-3"}).to_string())
        .expect(1)
        .create_async()
        .await;
    let stale = mock_forwarding_delete(&mut server, "cf-2", 1).await;
    let platform = mock_forwarding_delete(&mut server, "cf-mobile", 0).await;

    let prior = json!({
        "extension_id": "ext-1",
        "custom_hours": {"type": 1},
        "call_handling": {"call_not_answer_action": 1},
        "call_forwarding": {
            "enable_zoom_mobile_apps": true,
            "settings": [
                {"id": "cf-1", "description": "desk", "enable": true, "phone_number": "+15550101"},
                {"id": "cf-2", "description": "old", "enable": true, "phone_number": "+15550109"}
            ]
        }
    });
    let plan = json!({
        "extension_id": "ext-1",
        "custom_hours": {"type": 1},
        "call_handling": {"call_not_answer_action": 1},
        "call_forwarding": {
            "enable_zoom_mobile_apps": false,
            "settings": [
                {"id": "cf-1", "description": "desk", "enable": true, "phone_number": "+15550101"},
                {"description": "cell", "phone_number": "+15550102"}
            ]
        }
    });

    let response = update(resource.as_ref(), prior, plan).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    let new_entry = AttributePath::new("call_forwarding")
        .attribute("settings")
        .index(1)
        .attribute("id");
    assert_eq!(response.new_state.get_string(&new_entry).unwrap(), "cf-3");

    call_handling.assert_async().await;
    forwarding.assert_async().await;
    created.assert_async().await;
    stale.assert_async().await;
    platform.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn omitted_forwarding_is_reset_from_remote() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, BUSINESS_HOURS).await;

    let _get = server
        .mock("GET", SETTINGS_PATH)
        .with_body(business_settings(json!([
            {"id": "cf-mobile", "description": "Zoom Mobile Apps", "enable": false},
            {"id": "cf-1", "description": "desk", "enable": true, "phone_number": "+15550101"}
        ])))
        .create_async()
        .await;
    let _leading = mock_leading_patches(&mut server).await;
    let reset = server
        .mock("PATCH", BUSINESS_PATH)
        .match_body(Matcher::Json(json!({
            "sub_setting_type": "call_forwarding",
            "settings": {
                "require_press_1_before_connecting": false,
                "call_forwarding_settings": [{"id": "cf-mobile", "enable": true}]
            }
        })))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let stale = mock_forwarding_delete(&mut server, "cf-1", 1).await;

    // neither the prior state nor the plan declares call_forwarding
    let profile = json!({
        "extension_id": "ext-1",
        "custom_hours": {"type": 1},
        "call_handling": {"call_not_answer_action": 1}
    });
    let response = update(resource.as_ref(), profile.clone(), profile).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    assert!(response.new_state.value.get("call_forwarding").is_none());
    reset.assert_async().await;
    stale.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn external_contact_entries_survive_sync() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, BUSINESS_HOURS).await;

    let _get = server
        .mock("GET", SETTINGS_PATH)
        .with_body(business_settings(json!([
            platform_entry(),
            {"id": "cf-ext", "description": "on call", "enable": true,
             "external_contact": {"external_contact_id": "ec-1"}},
            {"id": "cf-1", "description": "desk", "enable": true, "phone_number": "+15550101"}
        ])))
        .create_async()
        .await;
    let _leading = mock_leading_patches(&mut server).await;
    let _forwarding = mock_patch(&mut server, "call_forwarding").await;
    let stale = mock_forwarding_delete(&mut server, "cf-1", 1).await;
    let external = mock_forwarding_delete(&mut server, "cf-ext", 0).await;

    let prior = json!({
        "extension_id": "ext-1",
        "custom_hours": {"type": 1},
        "call_forwarding": {
            "settings": [{"id": "cf-1", "description": "desk", "enable": true, "phone_number": "+15550101"}]
        }
    });
    let plan = json!({
        "extension_id": "ext-1",
        "custom_hours": {"type": 1},
        "call_forwarding": {"settings": []}
    });

    let response = update(resource.as_ref(), prior, plan).await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    stale.assert_async().await;
    external.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn converged_forwarding_is_left_alone() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, BUSINESS_HOURS).await;

    let _get = server
        .mock("GET", SETTINGS_PATH)
        .with_body(business_settings(json!([
            platform_entry(),
            {"id": "cf-1", "description": "desk", "enable": true, "phone_number": "+15550101"}
        ])))
        .create_async()
        .await;
    let _leading = mock_leading_patches(&mut server).await;
    let _forwarding = server
        .mock("PATCH", BUSINESS_PATH)
        .match_body(Matcher::PartialJson(json!({"sub_setting_type": "call_forwarding"})))
        .with_status(204)
        .expect(2)
        .create_async()
        .await;
    let created = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let deleted = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let profile = json!({
        "extension_id": "ext-1",
        "custom_hours": {"type": 1},
        "call_handling": {"call_not_answer_action": 1},
        "call_forwarding": {
            "enable_zoom_mobile_apps": true,
            "settings": [{"id": "cf-1", "description": "desk", "enable": true, "phone_number": "+15550101"}]
        }
    });

    let mut state = profile.clone();
    for _ in 0..2 {
        let response = update(resource.as_ref(), state, profile.clone()).await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        state = response.new_state.value;
    }

    created.assert_async().await;
    deleted.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn holiday_delete_tolerates_missing_holiday() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, HOLIDAY_HOURS).await;

    let delete = server
        .mock(
            "DELETE",
            "/phone/extension/ext-1/call_handling/settings/holiday_hours",
        )
        .match_query(Matcher::UrlEncoded("holiday_id".into(), "hol-1".into()))
        .with_status(404)
        .with_body(json!({"code": 404, "message": "Holiday not found"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let response = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: HOLIDAY_HOURS.to_string(),
                prior_state: DynamicValue::new(json!({
                    "extension_id": "ext-1",
                    "holiday_id": "hol-1",
                    "holiday": {
                        "name": "New Year",
                        "from": "2025-01-01T00:00:00Z",
                        "to": "2025-01-02T00:00:00Z"
                    },
                    "call_handling": {}
                })),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    delete.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn business_hours_delete_on_vanished_extension_succeeds() {
    let mut server = Server::new_async().await;
    let resource = configured_resource(&mut server, BUSINESS_HOURS).await;

    let _get = server
        .mock("GET", SETTINGS_PATH)
        .with_status(400)
        .with_body(json!({"code": 300, "message": "Extension does not exist"}).to_string())
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let response = resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: BUSINESS_HOURS.to_string(),
                prior_state: DynamicValue::new(json!({
                    "extension_id": "ext-1",
                    "custom_hours": {"type": 1},
                    "call_handling": {"call_not_answer_action": 1}
                })),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
    patch.assert_async().await;
}
