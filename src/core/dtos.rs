//! Caller-supplied payloads: creation inputs and partial-update patches.
//!
//! Patches use one `Option` per field: `None` means "not supplied", `Some`
//! means "set to this value". [`LiquorPatch::changes_from`] and friends keep
//! only the supplied fields whose value differs from the current entity, so an
//! empty result means the update is a no-op and no upstream write is needed.
use async_graphql::InputObject;
use serde::{Deserialize, Serialize};

use crate::core::entities::{Liquor, Post, Recipe};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, InputObject)]
#[serde(default)]
#[graphql(rename_fields = "snake_case")]
pub struct LiquorInput {
    pub name: String,
    #[serde(rename = "EAN", skip_serializing_if = "is_zero")]
    #[graphql(name = "EAN", default)]
    pub ean: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[graphql(default)]
    pub category: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[graphql(default)]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    #[graphql(default)]
    pub additional_attributes: String,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, InputObject)]
#[serde(default)]
pub struct IngredientInput {
    pub name: String,
    pub quantity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, InputObject)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipeInput {
    pub name: String,
    pub category: String,
    pub ingredients: Vec<IngredientInput>,
    pub instructions: Vec<String>,
    pub creator_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, InputObject)]
#[serde(default, rename_all = "camelCase")]
pub struct PostInput {
    pub url_image: String,
    pub title: String,
    pub content: String,
    pub author: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, InputObject)]
#[serde(default)]
pub struct RegisterInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[graphql(name = "type")]
    pub account_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, InputObject)]
#[serde(default)]
pub struct LoginInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[graphql(name = "type")]
    pub account_type: Option<String>,
}

/// Profile fields forwarded to the auth service on edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, InputObject)]
#[serde(default)]
#[graphql(name = "UserInput")]
pub struct ProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProfileInput {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.lastname.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.username.is_none()
            && self.image.is_none()
    }
}

/// Keep `proposed` only when it differs from `current`.
fn changed<T: PartialEq + Clone>(proposed: &Option<T>, current: &T) -> Option<T> {
    proposed.as_ref().filter(|value| *value != current).cloned()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, InputObject)]
#[serde(default)]
#[graphql(rename_fields = "snake_case")]
pub struct LiquorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "EAN", skip_serializing_if = "Option::is_none")]
    #[graphql(name = "EAN")]
    pub ean: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_attributes: Option<String>,
}

impl LiquorPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.ean.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.additional_attributes.is_none()
    }

    pub fn changes_from(&self, current: &Liquor) -> Self {
        Self {
            name: changed(&self.name, &current.name),
            ean: changed(&self.ean, &current.ean),
            category: changed(&self.category, &current.category),
            description: changed(&self.description, &current.description),
            additional_attributes: changed(
                &self.additional_attributes,
                &current.additional_attributes,
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, InputObject)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    /// Always forwarded when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<IngredientInput>>,
    /// Always forwarded when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquors: Option<Vec<String>>,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.instructions.is_none()
            && self.creator_id.is_none()
            && self.ingredients.is_none()
            && self.liquors.is_none()
    }

    pub fn changes_from(&self, current: &Recipe) -> Self {
        Self {
            name: changed(&self.name, &current.name),
            category: changed(&self.category, &current.category),
            description: changed(&self.description, &current.description),
            instructions: changed(&self.instructions, &current.instructions),
            creator_id: changed(&self.creator_id, &current.creator_id),
            ingredients: self.ingredients.clone(),
            liquors: self.liquors.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, InputObject)]
#[serde(default, rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.url_image.is_none()
            && self.title.is_none()
            && self.content.is_none()
            && self.author.is_none()
    }

    pub fn changes_from(&self, current: &Post) -> Self {
        Self {
            url_image: changed(&self.url_image, &current.url_image),
            title: changed(&self.title, &current.title),
            content: changed(&self.content, &current.content),
            author: changed(&self.author, &current.author),
        }
    }
}
