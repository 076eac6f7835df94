//! OpenAPI description of the device API.

use axum::Json;
use serde_json::{json, Value};

/// `GET /openapi.json`
pub async fn openapi_json() -> Json<Value> {
    Json(openapi_document())
}

/// Builds the OpenAPI 3.1 document for every device route.
pub fn openapi_document() -> Value {
    let device_id = json!({
        "name": "device_id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    });
    let not_found = json!({
        "description": "Device not found",
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorDetail" } } }
    });
    let device_body = json!({
        "required": true,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Device" } } }
    });
    let device_response = json!({
        "description": "Device",
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Device" } } }
    });

    let paths = json!({
        "/devices": {
            "get": {
                "operationId": "list_devices",
                "summary": "List devices",
                "responses": {
                    "200": {
                        "description": "All devices",
                        "content": { "application/json": { "schema": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Device" }
                        } } }
                    }
                }
            },
            "post": {
                "operationId": "create_device",
                "summary": "Create device",
                "requestBody": device_body,
                "responses": { "200": device_response }
            }
        },
        "/devices/{device_id}": {
            "get": {
                "operationId": "get_device",
                "summary": "Get device",
                "parameters": [device_id],
                "responses": { "200": device_response, "404": not_found }
            },
            "delete": {
                "operationId": "delete_device",
                "summary": "Delete device",
                "parameters": [device_id],
                "responses": {
                    "200": {
                        "description": "Device deleted",
                        "content": { "application/json": { "schema": {
                            "type": "object",
                            "properties": { "msg": { "type": "string" } },
                            "required": ["msg"]
                        } } }
                    },
                    "404": not_found
                }
            }
        },
        "/devices/{device_id}/command": {
            "post": {
                "operationId": "send_command",
                "summary": "Send command",
                "parameters": [device_id],
                "requestBody": {
                    "required": true,
                    "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Command" } } }
                },
                "responses": {
                    "200": {
                        "description": "Command applied",
                        "content": { "application/json": { "schema": {
                            "type": "object",
                            "properties": {
                                "message": { "type": "string" },
                                "device": { "$ref": "#/components/schemas/Device" }
                            },
                            "required": ["message", "device"]
                        } } }
                    },
                    "404": not_found
                }
            }
        }
    });

    let schemas = json!({
        "Device": {
            "type": "object",
            "properties": {
                "id": { "type": "string", "minLength": 1 },
                "name": { "type": "string" },
                "type": { "type": "string" },
                "status": { "type": "string" },
                "command_history": { "type": "array", "items": { "type": "string" } }
            },
            "required": ["id", "name", "type", "status", "command_history"]
        },
        "Command": {
            "type": "object",
            "properties": {
                "action": { "type": "string", "enum": ["status"] },
                "value": { "type": "string", "enum": ["online", "offline"] }
            },
            "required": ["action", "value"]
        },
        "ErrorDetail": {
            "type": "object",
            "properties": { "detail": { "type": "string" } },
            "required": ["detail"]
        }
    });

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Device Registry",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": paths,
        "components": { "schemas": schemas }
    })
}
