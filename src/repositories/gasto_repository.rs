use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::gasto::{Categoria, Gasto, Proveedor, TipoDocumento};
use crate::utils::errors::AppResult;

/// Fila de gasto con los nombres de sus referencias resueltos
#[derive(Debug, Clone, FromRow)]
pub struct GastoFila {
    pub id: Uuid,
    pub obra_id: Uuid,
    pub obra_nombre: String,
    pub categoria_id: Uuid,
    pub categoria_nombre: String,
    pub proveedor_id: Uuid,
    pub proveedor_nombre: String,
    pub tipo_documento_id: Uuid,
    pub tipo_documento_nombre: String,
    pub monto: Decimal,
    pub fecha: NaiveDate,
    pub fecha_creacion: NaiveDate,
    pub estado: bool,
    pub foto: Option<String>,
    pub sin_foto: bool,
    pub nota: String,
    pub creado_por_nombre: Option<String>,
}

/// Acceso a la rendición de gastos y sus catálogos (proveedores,
/// categorías y tipos de documento).
pub struct GastoRepository {
    pool: PgPool,
}

impl GastoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---- Proveedores ----

    pub async fn listar_proveedores(&self) -> AppResult<Vec<Proveedor>> {
        let proveedores =
            sqlx::query_as::<_, Proveedor>("SELECT * FROM proveedores ORDER BY fecha_creacion, nombre")
                .fetch_all(&self.pool)
                .await?;
        Ok(proveedores)
    }

    pub async fn buscar_proveedor(&self, id: Uuid) -> AppResult<Option<Proveedor>> {
        let proveedor = sqlx::query_as::<_, Proveedor>("SELECT * FROM proveedores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(proveedor)
    }

    pub async fn crear_proveedor(
        &self,
        nombre: &str,
        rut: &str,
        direccion: &str,
        telefono: &str,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<Proveedor> {
        let proveedor = sqlx::query_as::<_, Proveedor>(
            r#"
            INSERT INTO proveedores (id, nombre, rut, direccion, telefono, estado, fecha_creacion, creado_por)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nombre)
        .bind(rut)
        .bind(direccion)
        .bind(telefono)
        .bind(fecha_creacion)
        .bind(creado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(proveedor)
    }

    pub async fn actualizar_proveedor(
        &self,
        id: Uuid,
        nombre: &str,
        rut: &str,
        direccion: &str,
        telefono: &str,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<Proveedor> {
        let proveedor = sqlx::query_as::<_, Proveedor>(
            r#"
            UPDATE proveedores
            SET nombre = $2, rut = $3, direccion = $4, telefono = $5,
                fecha_creacion = $6, creado_por = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nombre)
        .bind(rut)
        .bind(direccion)
        .bind(telefono)
        .bind(fecha_creacion)
        .bind(creado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(proveedor)
    }

    pub async fn cambiar_estado_proveedor(&self, id: Uuid) -> AppResult<Option<Proveedor>> {
        let proveedor = sqlx::query_as::<_, Proveedor>(
            "UPDATE proveedores SET estado = NOT estado WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(proveedor)
    }

    // ---- Categorías ----

    pub async fn listar_categorias(&self) -> AppResult<Vec<Categoria>> {
        let categorias =
            sqlx::query_as::<_, Categoria>("SELECT * FROM categorias ORDER BY fecha_creacion, nombre")
                .fetch_all(&self.pool)
                .await?;
        Ok(categorias)
    }

    pub async fn buscar_categoria(&self, id: Uuid) -> AppResult<Option<Categoria>> {
        let categoria = sqlx::query_as::<_, Categoria>("SELECT * FROM categorias WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(categoria)
    }

    pub async fn crear_categoria(
        &self,
        nombre: &str,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<Categoria> {
        let categoria = sqlx::query_as::<_, Categoria>(
            r#"
            INSERT INTO categorias (id, nombre, estado, fecha_creacion, creado_por)
            VALUES ($1, $2, FALSE, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nombre)
        .bind(fecha_creacion)
        .bind(creado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(categoria)
    }

    pub async fn actualizar_categoria(
        &self,
        id: Uuid,
        nombre: &str,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<Categoria> {
        let categoria = sqlx::query_as::<_, Categoria>(
            r#"
            UPDATE categorias
            SET nombre = $2, fecha_creacion = $3, creado_por = $4
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
        Ok(categoria)
    }

    pub async fn cambiar_estado_categoria(&self, id: Uuid) -> AppResult<Option<Categoria>> {
        let categoria = sqlx::query_as::<_, Categoria>(
            "UPDATE categorias SET estado = NOT estado WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(categoria)
    }

    // ---- Tipos de documento ----

    pub async fn listar_tipos_documento(&self) -> AppResult<Vec<TipoDocumento>> {
        let tipos = sqlx::query_as::<_, TipoDocumento>(
            "SELECT * FROM tipos_documento ORDER BY fecha_creacion, nombre",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(tipos)
    }

    pub async fn buscar_tipo_documento(&self, id: Uuid) -> AppResult<Option<TipoDocumento>> {
        let tipo = sqlx::query_as::<_, TipoDocumento>("SELECT * FROM tipos_documento WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tipo)
    }

    pub async fn crear_tipo_documento(
        &self,
        nombre: &str,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<TipoDocumento> {
        let tipo = sqlx::query_as::<_, TipoDocumento>(
            r#"
            INSERT INTO tipos_documento (id, nombre, estado, fecha_creacion, creado_por)
            VALUES ($1, $2, FALSE, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(nombre)
        .bind(fecha_creacion)
        .bind(creado_por)
        .fetch_one(&self.pool)
        .await?;
        Ok(tipo)
    }

    pub async fn actualizar_tipo_documento(
        &self,
        id: Uuid,
        nombre: &str,
        fecha_creacion: NaiveDate,
        creado_por: Uuid,
    ) -> AppResult<TipoDocumento> {
        let tipo = sqlx::query_as::<_, TipoDocumento>(
            r#"
            UPDATE tipos_documento
            SET nombre = $2, fecha_creacion = $3, creado_por = $4
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
        Ok(tipo)
    }

    pub async fn cambiar_estado_tipo_documento(&self, id: Uuid) -> AppResult<Option<TipoDocumento>> {
        let tipo = sqlx::query_as::<_, TipoDocumento>(
            "UPDATE tipos_documento SET estado = NOT estado WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tipo)
    }

    // ---- Gastos ----

    /// Lista gastos con los nombres resueltos, el de fecha más reciente
    /// primero.
    pub async fn listar_gastos(&self) -> AppResult<Vec<GastoFila>> {
        let gastos = sqlx::query_as::<_, GastoFila>(
            r#"
            SELECT g.id, g.obra_id, o.nombre AS obra_nombre,
                   g.categoria_id, c.nombre AS categoria_nombre,
                   g.proveedor_id, p.nombre AS proveedor_nombre,
                   g.tipo_documento_id, t.nombre AS tipo_documento_nombre,
                   g.monto, g.fecha, g.fecha_creacion, g.estado,
                   g.foto, g.sin_foto, g.nota,
                   u.username AS creado_por_nombre
            FROM gastos g
            JOIN obras o ON o.id = g.obra_id
            JOIN categorias c ON c.id = g.categoria_id
            JOIN proveedores p ON p.id = g.proveedor_id
            JOIN tipos_documento t ON t.id = g.tipo_documento_id
            LEFT JOIN usuarios u ON u.id = g.creado_por
            ORDER BY g.fecha DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(gastos)
    }

    pub async fn buscar_gasto_fila(&self, id: Uuid) -> AppResult<Option<GastoFila>> {
        let gasto = sqlx::query_as::<_, GastoFila>(
            r#"
            SELECT g.id, g.obra_id, o.nombre AS obra_nombre,
                   g.categoria_id, c.nombre AS categoria_nombre,
                   g.proveedor_id, p.nombre AS proveedor_nombre,
                   g.tipo_documento_id, t.nombre AS tipo_documento_nombre,
                   g.monto, g.fecha, g.fecha_creacion, g.estado,
                   g.foto, g.sin_foto, g.nota,
                   u.username AS creado_por_nombre
            FROM gastos g
            JOIN obras o ON o.id = g.obra_id
            JOIN categorias c ON c.id = g.categoria_id
            JOIN proveedores p ON p.id = g.proveedor_id
            JOIN tipos_documento t ON t.id = g.tipo_documento_id
            LEFT JOIN usuarios u ON u.id = g.creado_por
            WHERE g.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(gasto)
    }

    pub async fn buscar_gasto(&self, id: Uuid) -> AppResult<Option<Gasto>> {
        let gasto = sqlx::query_as::<_, Gasto>("SELECT * FROM gastos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(gasto)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn crear_gasto(
        &self,
        obra_id: Uuid,
        categoria_id: Uuid,
        proveedor_id: Uuid,
        tipo_documento_id: Uuid,
        monto: Decimal,
        fecha: NaiveDate,
        fecha_creacion: NaiveDate,
        foto: Option<&str>,
        sin_foto: bool,
        nota: &str,
        creado_por: Uuid,
    ) -> AppResult<Gasto> {
        let gasto = sqlx::query_as::<_, Gasto>(
            r#"
            INSERT INTO gastos (id, obra_id, categoria_id, proveedor_id, monto, fecha,
                                tipo_documento_id, creado_por, fecha_creacion, estado,
                                foto, sin_foto, nota)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(obra_id)
        .bind(categoria_id)
        .bind(proveedor_id)
        .bind(monto)
        .bind(fecha)
        .bind(tipo_documento_id)
        .bind(creado_por)
        .bind(fecha_creacion)
        .bind(foto)
        .bind(sin_foto)
        .bind(nota)
        .fetch_one(&self.pool)
        .await?;
        Ok(gasto)
    }

    /// Actualiza los campos editables; el estado activo se preserva y la
    /// foto sólo cambia si llegó una nueva o se marcó "sin foto".
    #[allow(clippy::too_many_arguments)]
    pub async fn actualizar_gasto(
        &self,
        id: Uuid,
        obra_id: Uuid,
        categoria_id: Uuid,
        proveedor_id: Uuid,
        tipo_documento_id: Uuid,
        monto: Decimal,
        fecha: NaiveDate,
        fecha_creacion: NaiveDate,
        foto: Option<&str>,
        sin_foto: bool,
        nota: &str,
    ) -> AppResult<Gasto> {
        let gasto = sqlx::query_as::<_, Gasto>(
            r#"
            UPDATE gastos
            SET obra_id = $2, categoria_id = $3, proveedor_id = $4, tipo_documento_id = $5,
                monto = $6, fecha = $7, fecha_creacion = $8, foto = $9, sin_foto = $10,
                nota = $11
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(obra_id)
        .bind(categoria_id)
        .bind(proveedor_id)
        .bind(tipo_documento_id)
        .bind(monto)
        .bind(fecha)
        .bind(fecha_creacion)
        .bind(foto)
        .bind(sin_foto)
        .bind(nota)
        .fetch_one(&self.pool)
        .await?;
        Ok(gasto)
    }

    pub async fn cambiar_estado_gasto(&self, id: Uuid) -> AppResult<Option<Gasto>> {
        let gasto = sqlx::query_as::<_, Gasto>(
            "UPDATE gastos SET estado = NOT estado WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(gasto)
    }
}
