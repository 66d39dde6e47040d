use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, service_item, validation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub parent_id: Option<i32>,
    pub icon: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Parent,
    ServiceItem,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Parent => Entity::belongs_to(Entity)
                .from(Column::ParentId)
                .to(Column::Id)
                .into(),
            Relation::ServiceItem => Entity::has_many(service_item::Entity).into(),
        }
    }
}

impl Related<service_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    validation::require("name", name)?;
    validation::max_len("name", name, 255)
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    parent_id: Option<i32>,
    icon: Option<&str>,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    if let Some(pid) = parent_id {
        let parent = Entity::find_by_id(pid)
            .one(db)
            .await
            .map_err(errors::ModelError::from)?;
        if parent.is_none() {
            return Err(errors::ModelError::validation("Parent category not found"));
        }
    }
    let am = ActiveModel {
        name: Set(name.trim().to_string()),
        parent_id: Set(parent_id),
        icon: Set(icon.map(str::to_string)),
        ..Default::default()
    };
    am.insert(db).await.map_err(errors::ModelError::from)
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(errors::ModelError::from)
}

/// A category together with its descendants.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryNode {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub icon: Option<String>,
    pub children: Vec<CategoryNode>,
}

/// Arrange a flat category list into trees, roots first.
///
/// Categories whose parent is missing from `all` are treated as roots. A
/// category already placed on the current path is not revisited, so a
/// corrupted cycle in `parent_id` cannot recurse forever.
pub fn build_tree(all: &[Model]) -> Vec<CategoryNode> {
    fn children_of(all: &[Model], parent: i32, path: &mut Vec<i32>) -> Vec<CategoryNode> {
        let kids: Vec<&Model> = all
            .iter()
            .filter(|c| c.parent_id == Some(parent) && !path.contains(&c.id))
            .collect();
        kids.into_iter().map(|c| node(all, c, path)).collect()
    }
    fn node(all: &[Model], c: &Model, path: &mut Vec<i32>) -> CategoryNode {
        path.push(c.id);
        let children = children_of(all, c.id, path);
        path.pop();
        CategoryNode {
            id: c.id,
            name: c.name.clone(),
            parent_id: c.parent_id,
            icon: c.icon.clone(),
            children,
        }
    }

    let ids: Vec<i32> = all.iter().map(|c| c.id).collect();
    let mut path = Vec::new();
    all.iter()
        .filter(|c| match c.parent_id {
            None => true,
            Some(p) => !ids.contains(&p) || p == c.id,
        })
        .map(|c| node(all, c, &mut path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i32, parent_id: Option<i32>) -> Model {
        Model { id, name: format!("c{id}"), parent_id, icon: None }
    }

    #[test]
    fn nests_children_under_roots() {
        let all = vec![cat(1, None), cat(2, Some(1)), cat(3, Some(2)), cat(4, None), cat(5, Some(1))];
        let tree = build_tree(&all);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, 1);
        assert_eq!(tree[0].children.iter().map(|c| c.id).collect::<Vec<_>>(), vec![2, 5]);
        assert_eq!(tree[0].children[0].children[0].id, 3);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn orphan_becomes_root() {
        let tree = build_tree(&[cat(7, Some(99))]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].id, 7);
    }
}
