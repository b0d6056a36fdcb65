use crate::library::Error;
use chrono::NaiveDate;
use serde::Deserialize;

const INDEX: &str = include_str!("../../content/index.json");

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleMeta {
    pub id: String,
    pub title: String,
    pub topic: String,
    pub published: NaiveDate,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct Article {
    pub meta: ArticleMeta,
    pub body: &'static str,
}

/// The fixed set of articles shipped with the binary, in index order.
pub struct Catalog {
    articles: Vec<Article>,
}

fn body_for(id: &str) -> Option<&'static str> {
    match id {
        "etl-pipelines" => Some(include_str!("../../content/etl-pipelines.md")),
        "data-modeling-101" => Some(include_str!("../../content/data-modeling-101.md")),
        "refactoring-code-smells" => Some(include_str!("../../content/refactoring-code-smells.md")),
        "java-basics" => Some(include_str!("../../content/java-basics.md")),
        _ => None,
    }
}

impl Catalog {
    pub fn builtin() -> Result<Self, Error> {
        let metas: Vec<ArticleMeta> = serde_json::from_str(INDEX)?;
        let mut articles = Vec::with_capacity(metas.len());
        for meta in metas {
            let body = body_for(&meta.id).ok_or_else(|| Error::MissingBody(meta.id.clone()))?;
            articles.push(Article { meta, body });
        }
        Ok(Catalog { articles })
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn get(&self, id: &str) -> Option<&Article> {
        self.articles.iter().find(|a| a.meta.id == id)
    }
}
