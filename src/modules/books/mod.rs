pub mod entity;
pub mod handlers;
pub mod migrations;
pub mod models;
pub mod repository;
pub mod routes;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};
use sea_orm::DatabaseConnection;
use serde_json::json;

use repository::Repository;

/// Book catalogue: create, list, fetch and soft delete books.
pub struct BooksModule {
    repository: Repository,
}

impl BooksModule {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            repository: Repository::new(db),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        bookshelf_db::ping(self.repository.connection())
            .await
            .context("books store is not reachable")?;

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repository.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let message = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/MessageResponse" }
                    }
                }
            })
        };
        let id_parameter = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        });

        Some(json!({
            "paths": {
                "/create_books": {
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "200": message("Book created"),
                            "400": message("Insert failed"),
                            "422": message("Body could not be parsed")
                        }
                    }
                },
                "/delete_book/{id}": {
                    "delete": {
                        "summary": "Soft delete a book",
                        "tags": ["Books"],
                        "parameters": [id_parameter.clone()],
                        "responses": {
                            "200": message("Book deleted, or no live book had this id"),
                            "400": message("Delete failed"),
                            "500": message("Empty id")
                        }
                    }
                },
                "/get_books/{id}": {
                    "get": {
                        "summary": "Fetch a book by id",
                        "tags": ["Books"],
                        "parameters": [id_parameter],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookResponse" }
                                    }
                                }
                            },
                            "400": message("Book not found or lookup failed"),
                            "500": message("Empty id")
                        }
                    }
                },
                "/books": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every book that has not been deleted",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/BookListResponse"
                                        }
                                    }
                                }
                            },
                            "400": message("Query failed")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "author": { "type": "string" },
                            "title": { "type": "string" },
                            "publisher": { "type": "string" },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time" }
                        },
                        "required": [
                            "id", "author", "title", "publisher", "created_at", "updated_at"
                        ]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "author": { "type": "string" },
                            "title": { "type": "string" },
                            "publisher": { "type": "string" }
                        }
                    },
                    "BookResponse": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" },
                            "data": { "$ref": "#/components/schemas/Book" }
                        },
                        "required": ["message", "data"]
                    },
                    "BookListResponse": {
                        "type": "object",
                        "properties": {
                            "message": { "type": "string" },
                            "data": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["message", "data"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module bound to `db`
pub fn create_module(db: DatabaseConnection) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(db))
}
