//! Commands end to end against a mock table store.

use std::time::Duration;

use pantry_cli::cli::{parse_item, Command, RangeArgs, SellArgs};
use pantry_cli::commands;
use pantry_cli::config::{AppConfig, Role, UserEntry};
use pantry_cli::error::ErrorCode;
use pantry_cli::state::{hash_password, AppContext, Session};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn bakery() -> MockServer {
    let server = MockServer::start().await;
    let tables = [
        (
            "IngredientesBase",
            json!([
                {"Ingrediente": "Flour", "Costo de Compra": "20.00", "Cantidad por Unidad de Compra": "1000", "Unidad Receta": "g"},
                {"Ingrediente": "Sugar", "Costo de Compra": "10.00", "Cantidad por Unidad de Compra": "1000", "Unidad Receta": "g"}
            ]),
        ),
        (
            "Recetas",
            json!([
                {"Ingrediente": "Flour", "Dough": "500", "Cake": ""},
                {"Ingrediente": "Dough", "Dough": "", "Cake": "1"},
                {"Ingrediente": "Sugar", "Dough": "", "Cake": "100"}
            ]),
        ),
        ("Modificadores", json!([])),
        (
            "CostoPorProducto",
            json!([
                {"Producto": "Cake", "Precio Venta": "45.00", "Margen Bruto": "34.00", "Margen Bruto (%)": "75.56"}
            ]),
        ),
        (
            "Inventario",
            json!([
                {"Ingrediente": "Flour", "Stock Actual": "2000.0000", "Stock Mínimo": "0", "Stock Máximo": "0"},
                {"Ingrediente": "Sugar", "Stock Actual": "150.0000", "Stock Mínimo": "0", "Stock Máximo": "0"}
            ]),
        ),
        (
            "VentasDiarias",
            json!([
                {"Fecha": "01/01/2020", "Producto": "Cake", "Cantidad": "1", "Total Venta Bruto": "45.00", "Ganancia Neta": "34.00", "Forma Pago": "Efectivo"}
            ]),
        ),
    ];
    for (resource, body) in tables {
        Mock::given(method("GET"))
            .and(path(format!("/{resource}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
    }
    server
}

async fn accept_writes(server: &MockServer, resource: &str, status: u16) {
    Mock::given(method("PUT"))
        .and(path(format!("/{resource}")))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn written(server: &MockServer, resource: &str) -> Option<Value> {
    let requests = server.received_requests().await.unwrap_or_default();
    requests
        .iter()
        .rev()
        .find(|r| r.method.as_str() == "PUT" && r.url.path() == format!("/{resource}"))
        .map(|r| serde_json::from_slice(&r.body).unwrap())
}

fn context(server: &MockServer) -> AppContext {
    let mut config = AppConfig::default();
    config.store.endpoint = server.uri();
    for (name, role) in [("ana", Role::Admin), ("luis", Role::Seller)] {
        config.users.insert(
            name.to_string(),
            UserEntry {
                password_hash: hash_password("pw"),
                role,
            },
        );
    }
    AppContext::from_config(config).unwrap()
}

fn session(ctx: &AppContext, user: &str) -> Session {
    Session::login(&ctx.config.users, user, "pw", Duration::from_secs(300)).unwrap()
}

fn sell(items: &[&str]) -> Command {
    Command::Sell(SellArgs {
        items: items.iter().map(|i| parse_item(i).unwrap()).collect(),
        modifiers: vec![],
        card: false,
    })
}

#[tokio::test]
async fn sell_writes_ledger_then_inventory() {
    let server = bakery().await;
    accept_writes(&server, "VentasDiarias", 200).await;
    accept_writes(&server, "Inventario", 200).await;
    let ctx = context(&server);

    let out = commands::run(&ctx, &session(&ctx, "luis"), sell(&["cake:2"]))
        .await
        .unwrap();
    assert!(out.contains("Total charged: $90.00"));
    assert!(out.contains("Sugar (short by 50)"));

    let ledger = written(&server, "VentasDiarias").await.unwrap();
    let rows = ledger.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Fecha"], "01/01/2020");
    assert_eq!(rows[1]["Producto"], "Cake");
    assert_eq!(rows[1]["Cantidad"], "2");
    assert_eq!(rows[1]["Total Venta Bruto"], "90.00");
    assert_eq!(rows[1]["Costo Total"], "22.00");
    assert_eq!(rows[1]["Forma Pago"], "Efectivo");

    let inventory = written(&server, "Inventario").await.unwrap();
    let stock: Vec<(&str, &str)> = inventory
        .as_array()
        .unwrap()
        .iter()
        .map(|r| (r["Ingrediente"].as_str().unwrap(), r["Stock Actual"].as_str().unwrap()))
        .collect();
    assert_eq!(stock, vec![("Flour", "1000.0000"), ("Sugar", "0.0000")]);
}

#[tokio::test]
async fn failed_inventory_write_is_a_partial_checkout() {
    let server = bakery().await;
    accept_writes(&server, "VentasDiarias", 200).await;
    accept_writes(&server, "Inventario", 500).await;
    let ctx = context(&server);

    let err = commands::run(&ctx, &session(&ctx, "ana"), sell(&["Cake"]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PartialCheckout);
    assert_eq!(err.code.exit_code(), 5);
    assert!(err.message.contains("Flour"));
    assert!(written(&server, "VentasDiarias").await.is_some());
}

#[tokio::test]
async fn unknown_product_writes_nothing() {
    let server = bakery().await;
    let ctx = context(&server);

    let err = commands::run(&ctx, &session(&ctx, "ana"), sell(&["Pie"]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
    assert!(written(&server, "VentasDiarias").await.is_none());
}

#[tokio::test]
async fn history_hides_money_from_sellers() {
    let server = bakery().await;
    let ctx = context(&server);
    let range = RangeArgs {
        from: chrono::NaiveDate::from_ymd_opt(2020, 1, 1),
        to: chrono::NaiveDate::from_ymd_opt(2020, 1, 31),
    };

    let seller = commands::run(&ctx, &session(&ctx, "luis"), Command::History(range.clone()))
        .await
        .unwrap();
    assert!(seller.contains("01/01/2020"));
    assert!(!seller.contains('$'));

    let admin = commands::run(&ctx, &session(&ctx, "ana"), Command::History(range))
        .await
        .unwrap();
    assert!(admin.contains("$34.00"));
}

