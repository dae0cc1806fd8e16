use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::catalogo::{Ciudad, EstadoObra, Pais};
use crate::utils::errors::AppResult;

/// Fila de ciudad con el nombre del país resuelto
#[derive(Debug, Clone, FromRow)]
pub struct CiudadFila {
    pub id: Uuid,
    pub nombre: String,
    pub pais_id: Uuid,
    pub pais_nombre: String,
    pub estado: bool,
    pub fecha_creacion: NaiveDate,
    pub fecha_modificacion: chrono::DateTime<chrono::Utc>,
}

/// Acceso a los catálogos geográficos y de estados de obra. Los tres
/// comparten forma (nombre + estado activo), así que viven juntos.
pub struct CatalogoRepository {
    pool: PgPool,
}

impl CatalogoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---- Países ----

    pub async fn listar_paises(&self) -> AppResult<Vec<Pais>> {
        let paises = sqlx::query_as::<_, Pais>("SELECT * FROM paises ORDER BY nombre")
            .fetch_all(&self.pool)
            .await?;
        Ok(paises)
    }

    pub async fn buscar_pais(&self, id: Uuid) -> AppResult<Option<Pais>> {
        let pais = sqlx::query_as::<_, Pais>("SELECT * FROM paises WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(pais)
    }

    /// Se crea inactivo; la activación es un paso explícito.
    pub async fn crear_pais(
        &self,
        nombre: &str,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<Pais> {
        let pais = sqlx::query_as::<_, Pais>(
            r#"
            INSERT INTO paises (id, nombre, estado, creado_por, fecha_creacion, fecha_modificacion)
            VALUES ($1, $2, FALSE, $3, $4, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nombre)
        .bind(creado_por)
        .bind(fecha_creacion)
        .fetch_one(&self.pool)
        .await?;
        Ok(pais)
    }

    pub async fn actualizar_pais(
        &self,
        id: Uuid,
        nombre: &str,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<Pais> {
        let pais = sqlx::query_as::<_, Pais>(
            r#"
            UPDATE paises
            SET nombre = $2, fecha_creacion = $3, creado_por = $4, fecha_modificacion = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nombre)
        .bind(fecha_creacion)
        .bind(creado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(pais)
    }

    pub async fn cambiar_estado_pais(&self, id: Uuid) -> AppResult<Option<Pais>> {
        let pais = sqlx::query_as::<_, Pais>(
            "UPDATE paises SET estado = NOT estado, fecha_modificacion = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(pais)
    }

    /// Borra el país. Con ciudades asociadas la clave foránea RESTRICT
    /// hace fallar el borrado.
    pub async fn eliminar_pais(&self, id: Uuid) -> AppResult<u64> {
        let resultado = sqlx::query("DELETE FROM paises WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }

    // ---- Ciudades ----

    pub async fn listar_ciudades(&self) -> AppResult<Vec<CiudadFila>> {
        let ciudades = sqlx::query_as::<_, CiudadFila>(
            r#"
            SELECT c.id, c.nombre, c.pais_id, p.nombre AS pais_nombre,
                   c.estado, c.fecha_creacion, c.fecha_modificacion
            FROM ciudades c
            JOIN paises p ON p.id = c.pais_id
            ORDER BY c.nombre
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(ciudades)
    }

    pub async fn buscar_ciudad(&self, id: Uuid) -> AppResult<Option<Ciudad>> {
        let ciudad = sqlx::query_as::<_, Ciudad>("SELECT * FROM ciudades WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ciudad)
    }

    /// Unicidad del nombre dentro del país, sin distinguir mayúsculas.
    pub async fn ciudad_existe_en_pais(
        &self,
        nombre: &str,
        pais_id: Uuid,
        excluir: Option<Uuid>,
    ) -> AppResult<bool> {
        let fila: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM ciudades
                WHERE LOWER(nombre) = LOWER($1) AND pais_id = $2
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(nombre)
        .bind(pais_id)
        .bind(excluir)
        .fetch_one(&self.pool)
        .await?;
        Ok(fila.0)
    }

    pub async fn crear_ciudad(
        &self,
        nombre: &str,
        pais_id: Uuid,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<Ciudad> {
        let ciudad = sqlx::query_as::<_, Ciudad>(
            r#"
            INSERT INTO ciudades (id, nombre, pais_id, estado, creado_por, fecha_creacion, fecha_modificacion)
            VALUES ($1, $2, $3, FALSE, $4, $5, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nombre)
        .bind(pais_id)
        .bind(creado_por)
        .bind(fecha_creacion)
        .fetch_one(&self.pool)
        .await?;
        Ok(ciudad)
    }

    pub async fn actualizar_ciudad(
        &self,
        id: Uuid,
        nombre: &str,
        pais_id: Uuid,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<Ciudad> {
        let ciudad = sqlx::query_as::<_, Ciudad>(
            r#"
            UPDATE ciudades
            SET nombre = $2, pais_id = $3, fecha_creacion = $4, creado_por = $5,
                fecha_modificacion = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nombre)
        .bind(pais_id)
        .bind(fecha_creacion)
        .bind(creado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(ciudad)
    }

    pub async fn cambiar_estado_ciudad(&self, id: Uuid) -> AppResult<Option<Ciudad>> {
        let ciudad = sqlx::query_as::<_, Ciudad>(
            "UPDATE ciudades SET estado = NOT estado, fecha_modificacion = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ciudad)
    }

    pub async fn eliminar_ciudad(&self, id: Uuid) -> AppResult<u64> {
        let resultado = sqlx::query("DELETE FROM ciudades WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }

    // ---- Estados de obra ----

    pub async fn listar_estados(&self) -> AppResult<Vec<EstadoObra>> {
        let estados = sqlx::query_as::<_, EstadoObra>("SELECT * FROM estados_obra ORDER BY nombre")
            .fetch_all(&self.pool)
            .await?;
        Ok(estados)
    }

    pub async fn buscar_estado(&self, id: Uuid) -> AppResult<Option<EstadoObra>> {
        let estado = sqlx::query_as::<_, EstadoObra>("SELECT * FROM estados_obra WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(estado)
    }

    pub async fn crear_estado(
        &self,
        nombre: &str,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<EstadoObra> {
        let estado = sqlx::query_as::<_, EstadoObra>(
            r#"
            INSERT INTO estados_obra (id, nombre, estado, creado_por, fecha_creacion, fecha_modificacion)
            VALUES ($1, $2, FALSE, $3, $4, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nombre)
        .bind(creado_por)
        .bind(fecha_creacion)
        .fetch_one(&self.pool)
        .await?;
        Ok(estado)
    }

    pub async fn actualizar_estado(
        &self,
        id: Uuid,
        nombre: &str,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<EstadoObra> {
        let estado = sqlx::query_as::<_, EstadoObra>(
            r#"
            UPDATE estados_obra
            SET nombre = $2, fecha_creacion = $3, creado_por = $4, fecha_modificacion = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nombre)
        .bind(fecha_creacion)
        .bind(creado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(estado)
    }

    pub async fn cambiar_estado_estado(&self, id: Uuid) -> AppResult<Option<EstadoObra>> {
        let estado = sqlx::query_as::<_, EstadoObra>(
            "UPDATE estados_obra SET estado = NOT estado, fecha_modificacion = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(estado)
    }

    pub async fn eliminar_estado(&self, id: Uuid) -> AppResult<u64> {
        let resultado = sqlx::query("DELETE FROM estados_obra WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }
}
