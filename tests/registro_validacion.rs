//! Escenarios completos de guardado de un registro de libro de obras,
//! ejercitando la validación de horas y la detección de cambios tal
//! como las encadena el flujo de edición.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use urbix_backend::models::registro::{RegistroLibroObra, TareaRealizada, TrabajadorRegistro};
use urbix_backend::services::cambios_service::{
    registro_sin_cambios, RegistroSnapshot, SIN_CAMBIOS,
};
use urbix_backend::services::horas_service::validar_trabajadores;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn vecs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn registro_guardado(obra_id: Uuid, supervisor_id: Uuid) -> RegistroLibroObra {
    let ahora = chrono::Utc::now();
    RegistroLibroObra {
        id: Uuid::new_v4(),
        obra_id,
        fecha: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        supervisor_id,
        observaciones: Some("Avance normal".to_string()),
        fotografia: None,
        creado_por: Some(supervisor_id),
        fecha_creacion: ahora,
        fecha_modificacion: ahora,
    }
}

fn tarea(registro_id: Uuid, descripcion: &str, orden: i32) -> TareaRealizada {
    TareaRealizada {
        id: Uuid::new_v4(),
        registro_id,
        descripcion: descripcion.to_string(),
        orden,
    }
}

fn fila_guardada(registro_id: Uuid, trabajador_id: Uuid, horas: &str, extra: &str) -> TrabajadorRegistro {
    TrabajadorRegistro {
        id: Uuid::new_v4(),
        registro_id,
        trabajador_id,
        horas_trabajadas: dec(horas),
        horas_extras: dec(extra),
    }
}

#[test]
fn test_reenvio_identico_del_formulario_no_es_cambio() {
    let obra_id = Uuid::new_v4();
    let supervisor_id = Uuid::new_v4();
    let t1 = Uuid::new_v4();
    let t2 = Uuid::new_v4();

    let registro = registro_guardado(obra_id, supervisor_id);
    let tareas = vec![
        tarea(registro.id, "Moldaje", 1),
        tarea(registro.id, "Hormigonado", 2),
    ];
    let trabajadores = vec![
        fila_guardada(registro.id, t1, "8.00", "0.00"),
        fila_guardada(registro.id, t2, "6.50", "1.00"),
    ];
    let original = RegistroSnapshot::desde_guardado(&registro, &tareas, &trabajadores);

    // el formulario reenvía lo mismo, con coma decimal y otro orden de filas
    let filas = validar_trabajadores(
        &vecs(&[&t2.to_string(), &t1.to_string()]),
        &vecs(&["6,5", "8"]),
        &vecs(&["1", "0"]),
        &supervisor_id.to_string(),
    )
    .unwrap();
    let nuevo = RegistroSnapshot::desde_propuesta(
        obra_id,
        registro.fecha,
        "Avance normal",
        &vecs(&["Moldaje", "Hormigonado"]),
        &filas,
    );

    assert!(registro_sin_cambios(&original, &nuevo, false, false, false));
    assert_eq!(SIN_CAMBIOS, "No se realizaron cambios.");
}

#[test]
fn test_cambiar_horas_de_un_trabajador_es_cambio() {
    let obra_id = Uuid::new_v4();
    let supervisor_id = Uuid::new_v4();
    let t1 = Uuid::new_v4();

    let registro = registro_guardado(obra_id, supervisor_id);
    let tareas = vec![tarea(registro.id, "Moldaje", 1)];
    let trabajadores = vec![fila_guardada(registro.id, t1, "8.00", "0.00")];
    let original = RegistroSnapshot::desde_guardado(&registro, &tareas, &trabajadores);

    let filas = validar_trabajadores(
        &vecs(&[&t1.to_string()]),
        &vecs(&["7"]),
        &vecs(&["0"]),
        &supervisor_id.to_string(),
    )
    .unwrap();
    let nuevo = RegistroSnapshot::desde_propuesta(
        obra_id,
        registro.fecha,
        "Avance normal",
        &vecs(&["Moldaje"]),
        &filas,
    );

    assert!(!registro_sin_cambios(&original, &nuevo, false, false, false));
}

#[test]
fn test_reordenar_tareas_es_cambio_pero_reordenar_trabajadores_no() {
    let obra_id = Uuid::new_v4();
    let supervisor_id = Uuid::new_v4();
    let t1 = Uuid::new_v4();
    let t2 = Uuid::new_v4();

    let registro = registro_guardado(obra_id, supervisor_id);
    let tareas = vec![
        tarea(registro.id, "Moldaje", 1),
        tarea(registro.id, "Hormigonado", 2),
    ];
    let trabajadores = vec![
        fila_guardada(registro.id, t1, "8.00", "0.00"),
        fila_guardada(registro.id, t2, "6.50", "1.00"),
    ];
    let original = RegistroSnapshot::desde_guardado(&registro, &tareas, &trabajadores);

    let filas = validar_trabajadores(
        &vecs(&[&t2.to_string(), &t1.to_string()]),
        &vecs(&["6.5", "8"]),
        &vecs(&["1", "0"]),
        &supervisor_id.to_string(),
    )
    .unwrap();

    // mismas tareas, orden invertido
    let tareas_invertidas = RegistroSnapshot::desde_propuesta(
        obra_id,
        registro.fecha,
        "Avance normal",
        &vecs(&["Hormigonado", "Moldaje"]),
        &filas,
    );
    assert!(!registro_sin_cambios(&original, &tareas_invertidas, false, false, false));

    // tareas en el orden original: las filas invertidas no cuentan
    let mismo_orden = RegistroSnapshot::desde_propuesta(
        obra_id,
        registro.fecha,
        "Avance normal",
        &vecs(&["Moldaje", "Hormigonado"]),
        &filas,
    );
    assert!(registro_sin_cambios(&original, &mismo_orden, false, false, false));
}

#[test]
fn test_adjuntos_fuerzan_el_guardado_aunque_el_formulario_sea_igual() {
    let obra_id = Uuid::new_v4();
    let supervisor_id = Uuid::new_v4();

    let registro = registro_guardado(obra_id, supervisor_id);
    let original = RegistroSnapshot::desde_guardado(&registro, &[], &[]);
    let nuevo = RegistroSnapshot::desde_propuesta(
        obra_id,
        registro.fecha,
        "Avance normal",
        &[],
        &[],
    );

    assert!(registro_sin_cambios(&original, &nuevo, false, false, false));
    // archivo nuevo, foto principal nueva o eliminación pedida
    assert!(!registro_sin_cambios(&original, &nuevo, true, false, false));
    assert!(!registro_sin_cambios(&original, &nuevo, false, true, false));
    assert!(!registro_sin_cambios(&original, &nuevo, false, false, true));
}

#[test]
fn test_el_supervisor_guardado_no_puede_aparecer_como_trabajador() {
    let supervisor_id = Uuid::new_v4();
    let err = validar_trabajadores(
        &vecs(&[&supervisor_id.to_string()]),
        &vecs(&["8"]),
        &vecs(&["0"]),
        &supervisor_id.to_string(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation error: El supervisor no puede ser seleccionado como trabajador."
    );
}

#[test]
fn test_horas_fuera_de_tope_cortan_el_flujo_antes_de_comparar() {
    let t1 = Uuid::new_v4().to_string();
    let err = validar_trabajadores(
        &vecs(&[&t1]),
        &vecs(&["9"]),
        &vecs(&["4"]),
        &Uuid::new_v4().to_string(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation error: La suma de horas y horas extra no puede superar 12 por trabajador."
    );
}
