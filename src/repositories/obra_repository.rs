use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::obra::Obra;
use crate::utils::errors::AppResult;

/// Fila de obra con los nombres de sus referencias resueltos
#[derive(Debug, Clone, FromRow)]
pub struct ObraFila {
    pub id: Uuid,
    pub nombre: String,
    pub codigo: String,
    pub descripcion: Option<String>,
    pub direccion: String,
    pub ciudad_id: Uuid,
    pub ciudad_nombre: String,
    pub pais_nombre: String,
    pub fecha_inicio: NaiveDate,
    pub fecha_fin_estimada: NaiveDate,
    pub estado_obra_id: Uuid,
    pub estado_obra_nombre: String,
    pub estado: bool,
    pub creado_por_nombre: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_modificacion: DateTime<Utc>,
}

pub struct ObraRepository {
    pool: PgPool,
}

impl ObraRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista obras con ciudad, país, estado y creador resueltos,
    /// la más reciente primero.
    pub async fn listar(&self) -> AppResult<Vec<ObraFila>> {
        let obras = sqlx::query_as::<_, ObraFila>(
            r#"
            SELECT o.id, o.nombre, o.codigo, o.descripcion, o.direccion,
                   o.ciudad_id, c.nombre AS ciudad_nombre, p.nombre AS pais_nombre,
                   o.fecha_inicio, o.fecha_fin_estimada,
                   o.estado_obra_id, e.nombre AS estado_obra_nombre,
                   o.estado, u.username AS creado_por_nombre,
                   o.fecha_creacion, o.fecha_modificacion
            FROM obras o
            JOIN ciudades c ON c.id = o.ciudad_id
            JOIN paises p ON p.id = c.pais_id
            JOIN estados_obra e ON e.id = o.estado_obra_id
            LEFT JOIN usuarios u ON u.id = o.creado_por
            ORDER BY o.fecha_creacion DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(obras)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<Obra>> {
        let obra = sqlx::query_as::<_, Obra>("SELECT * FROM obras WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(obra)
    }

    /// Unicidad del código sin distinguir mayúsculas.
    pub async fn codigo_existe(&self, codigo: &str, excluir: Option<Uuid>) -> AppResult<bool> {
        let fila: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM obras WHERE LOWER(codigo) = LOWER($1) AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(codigo)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;
        Ok(fila.0)
    }

    /// Cantidad de registros de libro que referencian a la obra. Con
    /// registros la obra no puede eliminarse ni desactivarse.
    pub async fn contar_registros(&self, obra_id: Uuid) -> AppResult<i64> {
        let fila: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM registros_libro WHERE obra_id = $1")
                .bind(obra_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(fila.0)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn crear(
        &self,
        nombre: &str,
        codigo: &str,
        descripcion: Option<&str>,
        direccion: &str,
        ciudad_id: Uuid,
        fecha_inicio: NaiveDate,
        fecha_fin_estimada: NaiveDate,
        estado_obra_id: Uuid,
        creado_por: Uuid,
    ) -> AppResult<Obra> {
        let obra = sqlx::query_as::<_, Obra>(
            r#"
            INSERT INTO obras (id, nombre, codigo, descripcion, direccion, ciudad_id,
                               fecha_inicio, fecha_fin_estimada, estado_obra_id,
                               estado, creado_por, fecha_creacion, fecha_modificacion)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, $10, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nombre)
        .bind(codigo)
        .bind(descripcion)
        .bind(direccion)
        .bind(ciudad_id)
        .bind(fecha_inicio)
        .bind(fecha_fin_estimada)
        .bind(estado_obra_id)
        .bind(creado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(obra)
    }

    /// Actualiza los campos editables; el estado activo nunca cambia por
    /// esta vía (sólo por el toggle).
    #[allow(clippy::too_many_arguments)]
    pub async fn actualizar(
        &self,
        id: Uuid,
        nombre: &str,
        codigo: &str,
        descripcion: Option<&str>,
        direccion: &str,
        ciudad_id: Uuid,
        fecha_inicio: NaiveDate,
        fecha_fin_estimada: NaiveDate,
        estado_obra_id: Uuid,
        creado_por: Uuid,
    ) -> AppResult<Obra> {
        let obra = sqlx::query_as::<_, Obra>(
            r#"
            UPDATE obras
            SET nombre = $2, codigo = $3, descripcion = $4, direccion = $5,
                ciudad_id = $6, fecha_inicio = $7, fecha_fin_estimada = $8,
                estado_obra_id = $9, creado_por = $10, fecha_modificacion = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nombre)
        .bind(codigo)
        .bind(descripcion)
        .bind(direccion)
        .bind(ciudad_id)
        .bind(fecha_inicio)
        .bind(fecha_fin_estimada)
        .bind(estado_obra_id)
        .bind(creado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(obra)
    }

    pub async fn cambiar_estado(&self, id: Uuid) -> AppResult<Option<Obra>> {
        let obra = sqlx::query_as::<_, Obra>(
            "UPDATE obras SET estado = NOT estado, fecha_modificacion = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(obra)
    }

    pub async fn eliminar(&self, id: Uuid) -> AppResult<u64> {
        let resultado = sqlx::query("DELETE FROM obras WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }
}
