//! Pruebas de integración del repositorio de registros que sí tocan la
//! base de datos. Se saltan en silencio si `DATABASE_URL` no está
//! definida; con ella definida corren las migraciones y siembran sus
//! propios datos con nombres únicos por ejecución.

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use urbix_backend::repositories::registro_repository::RegistroRepository;

async fn pool_de_pruebas() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .ok()?;
    sqlx::migrate!("./migrations").run(&pool).await.ok()?;
    Some(pool)
}

/// Siembra la cadena completa usuario → país → ciudad → estado → obra
/// → registro con un adjunto, y devuelve (registro, adjunto, obra).
async fn sembrar_registro(pool: &PgPool) -> (Uuid, Uuid, Uuid) {
    let sufijo = Uuid::new_v4().simple().to_string();

    let usuario_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO usuarios (id, username, email, password_hash) VALUES ($1, $2, $3, 'x')",
    )
    .bind(usuario_id)
    .bind(format!("supervisor_{sufijo}"))
    .bind(format!("supervisor_{sufijo}@urbix.cl"))
    .execute(pool)
    .await
    .unwrap();

    let pais_id = Uuid::new_v4();
    sqlx::query("INSERT INTO paises (id, nombre, estado) VALUES ($1, $2, TRUE)")
        .bind(pais_id)
        .bind(format!("Pais {sufijo}"))
        .execute(pool)
        .await
        .unwrap();

    let ciudad_id = Uuid::new_v4();
    sqlx::query("INSERT INTO ciudades (id, nombre, pais_id, estado) VALUES ($1, $2, $3, TRUE)")
        .bind(ciudad_id)
        .bind(format!("Ciudad {sufijo}"))
        .bind(pais_id)
        .execute(pool)
        .await
        .unwrap();

    let estado_obra_id = Uuid::new_v4();
    sqlx::query("INSERT INTO estados_obra (id, nombre, estado) VALUES ($1, $2, TRUE)")
        .bind(estado_obra_id)
        .bind(format!("Estado {sufijo}"))
        .execute(pool)
        .await
        .unwrap();

    let obra_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO obras (id, nombre, codigo, direccion, ciudad_id,
                           fecha_inicio, fecha_fin_estimada, estado_obra_id)
        VALUES ($1, $2, $3, 'Av. Siempre Viva 123', $4, '2025-03-01', '2026-03-01', $5)
        "#,
    )
    .bind(obra_id)
    .bind(format!("Obra {sufijo}"))
    .bind(format!("OB-{sufijo}"))
    .bind(ciudad_id)
    .bind(estado_obra_id)
    .execute(pool)
    .await
    .unwrap();

    let registro_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO registros_libro (id, obra_id, fecha, supervisor_id, observaciones)
        VALUES ($1, $2, '2025-06-10', $3, 'Avance normal')
        "#,
    )
    .bind(registro_id)
    .bind(obra_id)
    .bind(usuario_id)
    .execute(pool)
    .await
    .unwrap();

    let foto_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO fotografias_registro (id, registro_id, archivo, tipo, orden)
        VALUES ($1, $2, $3, 'imagen', 0)
        "#,
    )
    .bind(foto_id)
    .bind(registro_id)
    .bind(format!("libro_obras/muro_{sufijo}.jpg"))
    .execute(pool)
    .await
    .unwrap();

    (registro_id, foto_id, obra_id)
}

#[tokio::test]
async fn test_eliminar_adjunto_de_otro_registro_no_tiene_efecto() {
    let Some(pool) = pool_de_pruebas().await else {
        return;
    };
    let repo = RegistroRepository::new(pool.clone());

    let (registro_a, foto_a, obra_a) = sembrar_registro(&pool).await;
    let (registro_b, foto_b, _) = sembrar_registro(&pool).await;

    // pedir borrar el adjunto de B al editar A se ignora sin error
    let fecha = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    repo.actualizar(
        registro_a,
        obra_a,
        fecha,
        "Avance normal",
        None,
        &[foto_b],
        &[],
        &["Moldaje".to_string()],
        &[],
    )
    .await
    .unwrap();

    assert_eq!(repo.contar_fotografias(registro_a).await.unwrap(), 1);
    assert_eq!(repo.contar_fotografias(registro_b).await.unwrap(), 1);

    // el mismo id sí borra cuando el adjunto pertenece al registro
    repo.actualizar(
        registro_a,
        obra_a,
        fecha,
        "Avance normal",
        None,
        &[foto_a],
        &[],
        &["Moldaje".to_string()],
        &[],
    )
    .await
    .unwrap();

    assert_eq!(repo.contar_fotografias(registro_a).await.unwrap(), 0);
    assert_eq!(repo.contar_fotografias(registro_b).await.unwrap(), 1);
}

#[tokio::test]
async fn test_contar_fotografias_en_ignora_ids_ajenos() {
    let Some(pool) = pool_de_pruebas().await else {
        return;
    };
    let repo = RegistroRepository::new(pool.clone());

    let (registro_a, foto_a, _) = sembrar_registro(&pool).await;
    let (_, foto_b, _) = sembrar_registro(&pool).await;

    // solo el adjunto propio cuenta; el ajeno y el inexistente no
    let cuenta = repo
        .contar_fotografias_en(registro_a, &[foto_a, foto_b, Uuid::new_v4()])
        .await
        .unwrap();
    assert_eq!(cuenta, 1);

    assert_eq!(repo.contar_fotografias_en(registro_a, &[]).await.unwrap(), 0);
}
