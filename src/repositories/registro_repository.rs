use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::registro::{FotografiaRegistro, RegistroLibroObra, TareaRealizada};
use crate::utils::errors::AppResult;

/// Fila de registro con obra y supervisor resueltos
#[derive(Debug, Clone, FromRow)]
pub struct RegistroFila {
    pub id: Uuid,
    pub obra_id: Uuid,
    pub obra_nombre: String,
    pub fecha: NaiveDate,
    pub supervisor_id: Uuid,
    pub supervisor_nombre: String,
    pub observaciones: Option<String>,
    pub fotografia: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_modificacion: DateTime<Utc>,
}

/// Fila de horas con el nombre del trabajador resuelto
#[derive(Debug, Clone, FromRow)]
pub struct TrabajadorFila {
    pub id: Uuid,
    pub trabajador_id: Uuid,
    pub trabajador_nombre: String,
    pub horas_trabajadas: Decimal,
    pub horas_extras: Decimal,
}

/// Archivo adjunto nuevo ya validado: ruta de almacenamiento y tipo
#[derive(Debug, Clone)]
pub struct ArchivoGuardar {
    pub archivo: String,
    pub tipo: String,
}

pub struct RegistroRepository {
    pool: PgPool,
}

impl RegistroRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> AppResult<Vec<RegistroFila>> {
        let registros = sqlx::query_as::<_, RegistroFila>(
            r#"
            SELECT r.id, r.obra_id, o.nombre AS obra_nombre, r.fecha,
                   r.supervisor_id,
                   COALESCE(NULLIF(TRIM(u.first_name || ' ' || u.last_name), ''), u.username)
                       AS supervisor_nombre,
                   r.observaciones, r.fotografia, r.fecha_creacion, r.fecha_modificacion
            FROM registros_libro r
            JOIN obras o ON o.id = r.obra_id
            JOIN usuarios u ON u.id = r.supervisor_id
            ORDER BY r.fecha DESC, r.fecha_creacion DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(registros)
    }

    pub async fn buscar_fila(&self, id: Uuid) -> AppResult<Option<RegistroFila>> {
        let registro = sqlx::query_as::<_, RegistroFila>(
            r#"
            SELECT r.id, r.obra_id, o.nombre AS obra_nombre, r.fecha,
                   r.supervisor_id,
                   COALESCE(NULLIF(TRIM(u.first_name || ' ' || u.last_name), ''), u.username)
                       AS supervisor_nombre,
                   r.observaciones, r.fotografia, r.fecha_creacion, r.fecha_modificacion
            FROM registros_libro r
            JOIN obras o ON o.id = r.obra_id
            JOIN usuarios u ON u.id = r.supervisor_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(registro)
    }

    pub async fn buscar_por_id(&self, id: Uuid) -> AppResult<Option<RegistroLibroObra>> {
        let registro =
            sqlx::query_as::<_, RegistroLibroObra>("SELECT * FROM registros_libro WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(registro)
    }

    pub async fn tareas_de(&self, registro_id: Uuid) -> AppResult<Vec<TareaRealizada>> {
        let tareas = sqlx::query_as::<_, TareaRealizada>(
            "SELECT * FROM tareas_realizadas WHERE registro_id = $1 ORDER BY orden",
        )
        .bind(registro_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tareas)
    }

    pub async fn trabajadores_de(&self, registro_id: Uuid) -> AppResult<Vec<TrabajadorFila>> {
        let trabajadores = sqlx::query_as::<_, TrabajadorFila>(
            r#"
            SELECT t.id, t.trabajador_id,
                   COALESCE(NULLIF(TRIM(u.first_name || ' ' || u.last_name), ''), u.username)
                       AS trabajador_nombre,
                   t.horas_trabajadas, t.horas_extras
            FROM trabajadores_registro t
            JOIN usuarios u ON u.id = t.trabajador_id
            WHERE t.registro_id = $1
            "#,
        )
        .bind(registro_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(trabajadores)
    }

    pub async fn fotografias_de(&self, registro_id: Uuid) -> AppResult<Vec<FotografiaRegistro>> {
        let fotografias = sqlx::query_as::<_, FotografiaRegistro>(
            "SELECT * FROM fotografias_registro WHERE registro_id = $1 ORDER BY orden",
        )
        .bind(registro_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fotografias)
    }

    pub async fn contar_fotografias(&self, registro_id: Uuid) -> AppResult<i64> {
        let fila: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM fotografias_registro WHERE registro_id = $1")
                .bind(registro_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(fila.0)
    }

    /// Cuenta cuántos de los ids dados son adjuntos del registro. Los
    /// ids que pertenecen a otro registro no cuentan, igual que en el
    /// borrado acotado de [`Self::actualizar`].
    pub async fn contar_fotografias_en(
        &self,
        registro_id: Uuid,
        ids: &[Uuid],
    ) -> AppResult<i64> {
        let fila: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM fotografias_registro WHERE registro_id = $1 AND id = ANY($2)",
        )
        .bind(registro_id)
        .bind(ids)
        .fetch_one(&self.pool)
        .await?;
        Ok(fila.0)
    }

    /// Crea el registro con todas sus colecciones hijas en una sola
    /// transacción: si una fila falla no queda nada a medio guardar.
    #[allow(clippy::too_many_arguments)]
    pub async fn crear(
        &self,
        obra_id: Uuid,
        fecha: NaiveDate,
        supervisor_id: Uuid,
        observaciones: &str,
        fotografia: Option<&str>,
        tareas: &[String],
        trabajadores: &[(Uuid, Decimal, Decimal)],
        archivos: &[ArchivoGuardar],
    ) -> AppResult<RegistroLibroObra> {
        let mut tx = self.pool.begin().await?;

        let registro = sqlx::query_as::<_, RegistroLibroObra>(
            r#"
            INSERT INTO registros_libro (id, obra_id, fecha, supervisor_id, observaciones,
                                         fotografia, creado_por, fecha_creacion, fecha_modificacion)
            VALUES ($1, $2, $3, $4, $5, $6, $4, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(obra_id)
        .bind(fecha)
        .bind(supervisor_id)
        .bind(observaciones)
        .bind(fotografia)
        .fetch_one(&mut *tx)
        .await?;

        for (i, archivo) in archivos.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO fotografias_registro (id, registro_id, archivo, tipo, orden, fecha_subida)
                VALUES ($1, $2, $3, $4, $5, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(registro.id)
            .bind(&archivo.archivo)
            .bind(&archivo.tipo)
            .bind(i as i32)
            .execute(&mut *tx)
            .await?;
        }

        // orden de tareas: posición de envío, desde 1
        for (i, descripcion) in tareas.iter().enumerate() {
            sqlx::query(
                "INSERT INTO tareas_realizadas (id, registro_id, descripcion, orden) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(registro.id)
            .bind(descripcion)
            .bind((i + 1) as i32)
            .execute(&mut *tx)
            .await?;
        }

        for (trabajador_id, horas, extras) in trabajadores {
            sqlx::query(
                r#"
                INSERT INTO trabajadores_registro (id, registro_id, trabajador_id, horas_trabajadas, horas_extras)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(registro.id)
            .bind(trabajador_id)
            .bind(horas)
            .bind(extras)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(registro)
    }

    /// Actualiza los campos del registro y reemplaza sus colecciones
    /// hijas, todo en una transacción.
    ///
    /// Las eliminaciones de adjuntos se acotan al registro: un id que
    /// pertenece a otro registro se ignora en silencio. Los archivos
    /// nuevos se numeran a continuación de los existentes, sin
    /// renumerar los anteriores. Tareas y trabajadores se borran y se
    /// recrean en el orden recibido.
    #[allow(clippy::too_many_arguments)]
    pub async fn actualizar(
        &self,
        id: Uuid,
        obra_id: Uuid,
        fecha: NaiveDate,
        observaciones: &str,
        nueva_fotografia: Option<&str>,
        eliminar_fotografias: &[Uuid],
        archivos_nuevos: &[ArchivoGuardar],
        tareas: &[String],
        trabajadores: &[(Uuid, Decimal, Decimal)],
    ) -> AppResult<RegistroLibroObra> {
        let mut tx = self.pool.begin().await?;

        let registro = sqlx::query_as::<_, RegistroLibroObra>(
            r#"
            UPDATE registros_libro
            SET obra_id = $2, fecha = $3, observaciones = $4,
                fotografia = COALESCE($5, fotografia),
                fecha_modificacion = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(obra_id)
        .bind(fecha)
        .bind(observaciones)
        .bind(nueva_fotografia)
        .fetch_one(&mut *tx)
        .await?;

        if !eliminar_fotografias.is_empty() {
            sqlx::query(
                "DELETE FROM fotografias_registro WHERE id = ANY($1) AND registro_id = $2",
            )
            .bind(eliminar_fotografias)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let (orden_inicial,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM fotografias_registro WHERE registro_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        for (i, archivo) in archivos_nuevos.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO fotografias_registro (id, registro_id, archivo, tipo, orden, fecha_subida)
                VALUES ($1, $2, $3, $4, $5, NOW())
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(&archivo.archivo)
            .bind(&archivo.tipo)
            .bind(orden_inicial as i32 + i as i32)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM tareas_realizadas WHERE registro_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for (i, descripcion) in tareas.iter().enumerate() {
            sqlx::query(
                "INSERT INTO tareas_realizadas (id, registro_id, descripcion, orden) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(descripcion)
            .bind((i + 1) as i32)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM trabajadores_registro WHERE registro_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for (trabajador_id, horas, extras) in trabajadores {
            sqlx::query(
                r#"
                INSERT INTO trabajadores_registro (id, registro_id, trabajador_id, horas_trabajadas, horas_extras)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(trabajador_id)
            .bind(horas)
            .bind(extras)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(registro)
    }

    pub async fn eliminar(&self, id: Uuid) -> AppResult<u64> {
        let resultado = sqlx::query("DELETE FROM registros_libro WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }

    /// Borra un adjunto individual y devuelve el id del registro dueño.
    pub async fn eliminar_fotografia(&self, id: Uuid) -> AppResult<Option<Uuid>> {
        let fila: Option<(Uuid,)> =
            sqlx::query_as("DELETE FROM fotografias_registro WHERE id = $1 RETURNING registro_id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(fila.map(|(registro_id,)| registro_id))
    }
}
