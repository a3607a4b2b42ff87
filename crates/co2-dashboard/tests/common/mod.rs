use std::sync::Arc;
use std::time::Duration;

use bson::doc;
use co2_client::MemoryClient;
use co2_dashboard::{Dashboard, ManualClock};

pub const TTL: Duration = Duration::from_secs(300);

pub type TestDashboard = Dashboard<Arc<MemoryClient>, ManualClock>;

pub fn dashboard(client: &Arc<MemoryClient>) -> (TestDashboard, ManualClock) {
    let clock = ManualClock::new();
    let dashboard = Dashboard::with_clock(Arc::clone(client), TTL, clock.clone());
    (dashboard, clock)
}

/// Cities, the emitters joined to them, states without a `nome` field and
/// locations labelled by `descricao`.
pub fn seeded() -> Arc<MemoryClient> {
    let client = MemoryClient::new();
    client.insert_many(
        "cidade",
        vec![
            doc! { "_id": "c-1", "nome": "Recife", "uf": "PE" },
            doc! { "_id": "c-2", "nome": "Olinda", "uf": "PE" },
            doc! { "_id": "c-3", "nome": "Santos", "uf": "SP" },
        ],
    );
    client.insert_many(
        "emissores_por_cidade",
        vec![
            doc! { "_id": "epc-1", "id_cidade": "c-1", "emissor": "Termo Suape", "toneladas_co2": 1200.5 },
            doc! { "_id": "epc-2", "id_cidade": "c-1", "emissor": "Porto Digital", "toneladas_co2": 80.0 },
            doc! { "_id": "epc-3", "id_cidade": "c-3", "emissor": "Porto de Santos", "toneladas_co2": 5400.0 },
        ],
    );
    client.insert_many(
        "estado",
        vec![
            doc! { "_id": "PE", "sigla": "PE", "regiao": "Nordeste" },
            doc! { "_id": "SP", "sigla": "SP", "regiao": "Sudeste" },
        ],
    );
    client.insert_many(
        "organizacoes_por_estado",
        vec![doc! { "_id": "ope-1", "id_estado": "SP", "organizacao": "Verde SA" }],
    );
    client.insert_many(
        "localizacao",
        vec![
            doc! { "_id": "l-1", "descricao": "Zona portuaria", "nome": "ignored" },
            doc! { "_id": "l-2", "descricao": "Distrito industrial" },
        ],
    );
    client.create_collection("emissor");
    Arc::new(client)
}
