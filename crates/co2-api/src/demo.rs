//! Sample keyspace served by `--demo`.

use bson::doc;
use co2_client::MemoryClient;

pub fn seeded_client() -> MemoryClient {
    let client = MemoryClient::new();

    client.insert_many(
        "estado",
        vec![
            doc! { "_id": "PE", "nome": "Pernambuco", "regiao": "Nordeste" },
            doc! { "_id": "SP", "nome": "Sao Paulo", "regiao": "Sudeste" },
            doc! { "_id": "AM", "nome": "Amazonas", "regiao": "Norte" },
        ],
    );
    client.insert_many(
        "cidade",
        vec![
            doc! { "_id": "cid-1", "nome": "Recife", "id_estado": "PE", "populacao": 1_488_920_i64 },
            doc! { "_id": "cid-2", "nome": "Santos", "id_estado": "SP", "populacao": 418_608_i64 },
            doc! { "_id": "cid-3", "nome": "Manaus", "id_estado": "AM", "populacao": 2_063_547_i64 },
        ],
    );
    client.insert_many(
        "tipo_emissor",
        vec![
            doc! { "_id": "tip-1", "nome": "Industrial" },
            doc! { "_id": "tip-2", "nome": "Transporte" },
        ],
    );
    client.insert_many(
        "emissor",
        vec![
            doc! { "_id": "emi-1", "nome": "Termoeletrica Suape", "id_tipo": "tip-1" },
            doc! { "_id": "emi-2", "nome": "Porto de Santos", "id_tipo": "tip-2" },
            doc! { "_id": "emi-3", "nome": "Polo Industrial de Manaus", "id_tipo": "tip-1" },
        ],
    );
    client.insert_many(
        "emissores_por_cidade",
        vec![
            doc! { "_id": "epc-1", "id_cidade": "cid-1", "emissor": "Termoeletrica Suape", "toneladas_co2": 182_000.0 },
            doc! { "_id": "epc-2", "id_cidade": "cid-2", "emissor": "Porto de Santos", "toneladas_co2": 95_400.0 },
            doc! { "_id": "epc-3", "id_cidade": "cid-3", "emissor": "Polo Industrial de Manaus", "toneladas_co2": 240_150.0 },
        ],
    );
    client.insert_many(
        "cidades_por_emissor",
        vec![
            doc! { "_id": "cpe-1", "id_emissor": "emi-1", "cidade": "Recife", "estado": "PE" },
            doc! { "_id": "cpe-2", "id_emissor": "emi-2", "cidade": "Santos", "estado": "SP" },
            doc! { "_id": "cpe-3", "id_emissor": "emi-3", "cidade": "Manaus", "estado": "AM" },
        ],
    );
    client.insert_many(
        "organizacao",
        vec![
            doc! { "_id": "org-1", "nome": "Instituto Mata Atlantica", "id_estado": "PE" },
            doc! { "_id": "org-2", "nome": "Observatorio do Clima SP", "id_estado": "SP" },
        ],
    );
    client.insert_many(
        "organizacoes_por_estado",
        vec![
            doc! { "_id": "ope-1", "id_estado": "PE", "organizacao": "Instituto Mata Atlantica" },
            doc! { "_id": "ope-2", "id_estado": "SP", "organizacao": "Observatorio do Clima SP" },
        ],
    );
    client.insert_many(
        "localizacao",
        vec![
            doc! { "_id": "loc-1", "descricao": "Complexo portuario de Suape", "lat": -8.39, "lon": -34.97 },
            doc! { "_id": "loc-2", "descricao": "Zona Franca de Manaus", "lat": -3.12, "lon": -60.02 },
        ],
    );
    client.insert_many(
        "funcionario",
        vec![doc! { "_id": "fun-1", "nome": "Ana Souza", "cargo": "Analista ambiental", "id_organizacao": "org-1" }],
    );
    client.create_collection("especie");

    client
}
