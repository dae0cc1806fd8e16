use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::usuario::{Grupo, Usuario};
use crate::utils::errors::AppResult;

pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista usuarios en orden de creación; con `q` filtra por
    /// username, email o nombre de grupo (subcadena, sin distinguir
    /// mayúsculas).
    pub async fn listar(&self, q: Option<&str>) -> AppResult<Vec<Usuario>> {
        let usuarios = match q {
            Some(q) if !q.trim().is_empty() => {
                let patron = format!("%{}%", q.trim());
                sqlx::query_as::<_, Usuario>(
                    r#"
                    SELECT DISTINCT u.*
                    FROM usuarios u
                    LEFT JOIN usuario_grupos ug ON ug.usuario_id = u.id
                    LEFT JOIN grupos g ON g.id = ug.grupo_id
                    WHERE u.username ILIKE $1 OR u.email ILIKE $1 OR g.nombre ILIKE $1
                    ORDER BY u.date_joined
                    "#,
                )
                .bind(patron)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios ORDER BY date_joined")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(usuarios)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<Usuario>> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn username_existe(&self, username: &str, excluir: Option<Uuid>) -> AppResult<bool> {
        let fila: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM usuarios WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(username)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;
        Ok(fila.0)
    }

    pub async fn email_existe(&self, email: &str, excluir: Option<Uuid>) -> AppResult<bool> {
        let fila: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM usuarios WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;
        Ok(fila.0)
    }

    /// Crea el usuario y su vínculo de grupo en una transacción.
    pub async fn crear(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        grupo_id: Uuid,
    ) -> AppResult<Usuario> {
        let mut tx = self.pool.begin().await?;

        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (id, username, email, first_name, last_name, password_hash, is_active, date_joined)
            VALUES ($1, $2, $3, '', '', $4, TRUE, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO usuario_grupos (usuario_id, grupo_id) VALUES ($1, $2)")
            .bind(usuario.id)
            .bind(grupo_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(usuario)
    }

    /// Actualiza los datos del usuario y reemplaza su grupo, todo en
    /// una transacción.
    pub async fn actualizar(
        &self,
        id: Uuid,
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
        date_joined: DateTime<Utc>,
        grupo_id: Uuid,
    ) -> AppResult<Usuario> {
        let mut tx = self.pool.begin().await?;

        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios
            SET username = $2, email = $3, first_name = $4, last_name = $5, date_joined = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(first_name)
        .bind(last_name)
        .bind(date_joined)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM usuario_grupos WHERE usuario_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO usuario_grupos (usuario_id, grupo_id) VALUES ($1, $2)")
            .bind(id)
            .bind(grupo_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(usuario)
    }

    pub async fn grupos_de(&self, usuario_id: Uuid) -> AppResult<Vec<Grupo>> {
        let grupos = sqlx::query_as::<_, Grupo>(
            r#"
            SELECT g.* FROM grupos g
            JOIN usuario_grupos ug ON ug.grupo_id = g.id
            WHERE ug.usuario_id = $1
            ORDER BY g.nombre
            "#,
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(grupos)
    }

    pub async fn cambiar_estado(&self, id: Uuid) -> AppResult<Option<Usuario>> {
        let usuario = sqlx::query_as::<_, Usuario>(
            "UPDATE usuarios SET is_active = NOT is_active WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(usuario)
    }

    /// Borra el usuario. Si está referenciado como supervisor o
    /// trabajador la clave foránea RESTRICT hace fallar el borrado.
    pub async fn eliminar(&self, id: Uuid) -> AppResult<u64> {
        let resultado = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }

    pub async fn listar_grupos(&self) -> AppResult<Vec<Grupo>> {
        let grupos = sqlx::query_as::<_, Grupo>("SELECT * FROM grupos ORDER BY nombre")
            .fetch_all(&self.pool)
            .await?;
        Ok(grupos)
    }

    pub async fn buscar_grupo(&self, id: Uuid) -> AppResult<Option<Grupo>> {
        let grupo = sqlx::query_as::<_, Grupo>("SELECT * FROM grupos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(grupo)
    }
}
