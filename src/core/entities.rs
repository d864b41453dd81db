//! Records mirroring the upstream services' JSON representations.
//!
//! The gateway never persists these; they are decoded from an upstream body
//! and handed back to the caller. Identifiers are opaque strings assigned by
//! the upstream. Missing fields decode to their defaults, which is what the
//! empty-payload not-found checks in the upstream clients rely on.
use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(default)]
#[graphql(rename_fields = "snake_case")]
pub struct Liquor {
    #[serde(rename = "_id")]
    #[graphql(name = "_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "EAN")]
    #[graphql(name = "EAN")]
    pub ean: i64,
    pub category: String,
    pub description: String,
    pub additional_attributes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(default)]
pub struct Ingredient {
    #[serde(rename = "_id", skip_serializing_if = "String::is_empty")]
    #[graphql(name = "_id")]
    pub id: String,
    pub name: String,
    pub quantity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(default)]
#[graphql(rename_fields = "snake_case")]
pub struct Rating {
    pub user_id: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(default, rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id")]
    #[graphql(name = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub creator_id: String,
    pub rating: f64,
    pub likes: i64,
    pub liquors: Vec<String>,
    pub created_at: String,
    pub ratings: Vec<Rating>,
    pub description: String,
    pub average_rating: f64,
}

/// Recipe proposed by the AI service for a given liquor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(default, rename_all = "camelCase")]
#[graphql(name = "AIRecipe")]
pub struct AiRecipe {
    pub cocktail_name: String,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub observations: String,
}

/// Product scraped from an external catalogue by barcode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(default)]
#[graphql(rename_fields = "snake_case")]
pub struct Product {
    pub name: String,
    pub photo_link: String,
    pub description: String,
    pub additional_attributes: String,
    pub isbn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(default)]
#[graphql(rename_fields = "snake_case")]
pub struct User {
    pub user_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lastname: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(default)]
#[graphql(rename_fields = "snake_case")]
pub struct SuccessfulLogin {
    #[serde(rename = "id")]
    pub user_id: String,
    pub name: String,
    pub double_auth: bool,
    pub expiration: String,
    pub token: String,
    pub account_type: String,
}

/// `{ "data": … }` wrapper used by the auth service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DataWrapper<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(default, rename_all = "camelCase")]
pub struct Interaction {
    #[serde(rename = "type")]
    #[graphql(name = "type")]
    pub kind: i64,
    pub value: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(default, rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    #[graphql(name = "_id")]
    pub id: String,
    pub url_image: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created_at: String,
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquor_wire_names() {
        let liquor: Liquor = serde_json::from_str(
            r#"{"_id":"l1","name":"Ron","EAN":7701,"additional_attributes":"40%"}"#,
        )
        .unwrap();

        assert_eq!(liquor.id, "l1");
        assert_eq!(liquor.ean, 7701);
        assert_eq!(liquor.additional_attributes, "40%");
        assert!(liquor.category.is_empty());
    }

    #[test]
    fn test_missing_id_decodes_to_empty() {
        let liquor: Liquor = serde_json::from_str("{}").unwrap();
        assert!(liquor.id.is_empty());

        let post: Post = serde_json::from_str(r#"{"title":"hola"}"#).unwrap();
        assert!(post.id.is_empty());
    }

    #[test]
    fn test_successful_login_reads_id() {
        let wrapper: DataWrapper<SuccessfulLogin> =
            serde_json::from_str(r#"{"data":{"id":"u1","token":"t","double_auth":true}}"#)
                .unwrap();

        assert_eq!(wrapper.data.user_id, "u1");
        assert_eq!(wrapper.data.token, "t");
        assert!(wrapper.data.double_auth);
    }

    #[test]
    fn test_interaction_type_field() {
        let interaction: Interaction =
            serde_json::from_str(r#"{"type":2,"value":"like","userId":"u9"}"#).unwrap();
        assert_eq!(interaction.kind, 2);
        assert_eq!(interaction.user_id, "u9");
    }
}
