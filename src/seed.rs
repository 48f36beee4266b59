use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Comment, Complaint, Location, Response, Status, User};

pub const COMPLAINT_COUNT: usize = 25;

pub const CITIES: [&str; 8] = [
    "São Paulo",
    "Curitiba",
    "Florianópolis",
    "Porto Alegre",
    "Belo Horizonte",
    "Brasília",
    "Rio de Janeiro",
    "Salvador",
];

pub const CATEGORIES: [(&str, &[&str]); 8] = [
    (
        "Infraestrutura",
        &[
            "Buraco na Via",
            "Iluminação Pública",
            "Calçada Danificada",
            "Alagamento",
            "Sinalização",
        ],
    ),
    (
        "Saúde",
        &[
            "Atendimento Ruim",
            "Falta de Medicamentos",
            "Condições Sanitárias",
            "Tempo de Espera",
        ],
    ),
    (
        "Educação",
        &[
            "Estrutura Escolar",
            "Falta de Professores",
            "Material Didático",
            "Transporte Escolar",
        ],
    ),
    (
        "Segurança",
        &[
            "Falta de Policiamento",
            "Iluminação Precária",
            "Áreas de Risco",
            "Câmeras de Segurança",
        ],
    ),
    (
        "Transporte",
        &[
            "Transporte Público",
            "Pontos de Ônibus",
            "Horários",
            "Condições dos Veículos",
        ],
    ),
    (
        "Meio Ambiente",
        &["Poluição", "Lixo/Entulho", "Áreas Verdes", "Poda de Árvores"],
    ),
    (
        "Serviços Públicos",
        &[
            "Falta de Água",
            "Energia Elétrica",
            "Coleta de Lixo",
            "Limpeza Urbana",
        ],
    ),
    (
        "Outros",
        &["Barulho Excessivo", "Eventos", "Fiscalização", "Outros"],
    ),
];

pub const USER_NAMES: [&str; 12] = [
    "Maria Silva",
    "João Santos",
    "Ana Costa",
    "Pedro Oliveira",
    "Carla Souza",
    "Roberto Almeida",
    "Fernanda Lima",
    "Lucas Martins",
    "Juliana Pereira",
    "Marcos Rodrigues",
    "Camila Ferreira",
    "Bruno Gomes",
];

pub const ADMIN_NAME: &str = "Administrador Municipal";

pub struct SeedData {
    pub complaints: Vec<Complaint>,
    pub users: Vec<User>,
    /// Index into `users` of the user logged in after seeding.
    pub current_user: usize,
}

pub fn types_for(category: &str) -> Option<&'static [&'static str]> {
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, types)| *types)
}

pub fn generate<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> SeedData {
    let complaints = (1..=COMPLAINT_COUNT)
        .map(|n| generate_complaint(rng, now, n))
        .collect();

    SeedData {
        complaints,
        users: generate_users(),
        current_user: 1,
    }
}

fn generate_complaint<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>, n: usize) -> Complaint {
    let city = CITIES[rng.gen_range(0..CITIES.len())];
    let (category, types) = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
    let kind = types[rng.gen_range(0..types.len())];
    let author = rng.gen_range(0..USER_NAMES.len());

    let date = now - Duration::days(rng.gen_range(0..30));
    let status = *Status::ALL.choose(rng).unwrap_or(&Status::Awaiting);

    let images = (1..=rng.gen_range(0..4))
        .map(|i| format!("/placeholder.svg?height=400&width=600&text=Imagem+{}-{}", n, i))
        .collect();

    let comments = (0..rng.gen_range(0..6))
        .map(|j| {
            let commenter = rng.gen_range(0..USER_NAMES.len());
            let remark = if rng.gen_bool(0.5) {
                "Concordo com o problema relatado."
            } else {
                "Também estou enfrentando este problema na região."
            };
            Comment {
                id: format!("comment-{}-{}", n, j),
                user_id: format!("user-{}", commenter),
                user_name: USER_NAMES[commenter].to_string(),
                user_avatar: None,
                text: format!("Este é um comentário sobre a reclamação #{}. {}", n, remark),
                date: date + Duration::hours(rng.gen_range(0..24)),
            }
        })
        .collect();

    let likes = (0..rng.gen_range(0..=50))
        .map(|i| format!("user-like-{}", i))
        .collect();

    let responded = match status {
        Status::Resolved => true,
        Status::InProgress => rng.gen_bool(0.5),
        Status::Awaiting => false,
    };
    let response = if responded {
        let outcome = if status == Status::Resolved {
            "O problema foi solucionado."
        } else {
            "Estamos trabalhando para resolver este problema o mais rápido possível."
        };
        Some(Response {
            text: format!("Agradecemos pelo relato. {}", outcome),
            date: date + Duration::hours(rng.gen_range(0..72)),
            admin_name: ADMIN_NAME.to_string(),
        })
    } else {
        None
    };

    let location = Location {
        lat: -23.5505 + (rng.gen::<f64>() - 0.5) * 10.0,
        lng: -46.6333 + (rng.gen::<f64>() - 0.5) * 10.0,
        address: Some(format!(
            "Rua Exemplo, {}, {}",
            rng.gen_range(0..1000),
            city
        )),
    };

    Complaint {
        id: format!("complaint-{}", n),
        title: format!("{} em {} - {}", kind, city, n),
        description: format!(
            "Esta é uma reclamação sobre {} na cidade de {}. O problema está causando transtornos para os moradores da região há várias semanas.",
            kind.to_lowercase(),
            city
        ),
        city: city.to_string(),
        category: category.to_string(),
        kind: kind.to_string(),
        status,
        images,
        user_id: format!("user-{}", author),
        user_name: USER_NAMES[author].to_string(),
        user_avatar: None,
        date,
        likes,
        comments,
        location: Some(location),
        response,
    }
}

fn generate_users() -> Vec<User> {
    let mut users = vec![
        User {
            id: "user-admin-1".to_string(),
            name: "Admin Principal".to_string(),
            email: "admin@opinaai.com".to_string(),
            avatar: None,
            is_admin: true,
        },
        User {
            id: "user-1".to_string(),
            name: "Usuário Teste".to_string(),
            email: "usuario@teste.com".to_string(),
            avatar: None,
            is_admin: false,
        },
    ];

    users.extend(USER_NAMES.iter().enumerate().map(|(i, name)| User {
        id: format!("user-{}", i),
        name: name.to_string(),
        email: format!("{}@email.com", name.to_lowercase().replacen(' ', ".", 1)),
        avatar: None,
        is_admin: false,
    }));

    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> SeedData {
        let mut rng = StdRng::seed_from_u64(seed);
        generate(&mut rng, Utc::now())
    }

    #[test]
    fn test_generates_expected_counts() {
        let data = seeded(7);
        assert_eq!(data.complaints.len(), COMPLAINT_COUNT);
        assert_eq!(data.users.len(), 2 + USER_NAMES.len());
        assert_eq!(data.users[data.current_user].name, "Usuário Teste");
        assert!(!data.users[data.current_user].is_admin);
        assert!(data.users.iter().any(|u| u.is_admin));
    }

    #[test]
    fn test_ids_are_sequential() {
        let data = seeded(1);
        for (i, c) in data.complaints.iter().enumerate() {
            assert_eq!(c.id, format!("complaint-{}", i + 1));
        }
    }

    #[test]
    fn test_user_emails() {
        let data = seeded(1);
        let maria = data.users.iter().find(|u| u.name == "Maria Silva").unwrap();
        assert_eq!(maria.email, "maria.silva@email.com");
        assert_eq!(maria.id, "user-0");
    }

    #[test]
    fn test_same_seed_same_data() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        let now = Utc::now();
        let first = generate(&mut a, now);
        let second = generate(&mut b, now);
        assert_eq!(first.complaints, second.complaints);
    }

    proptest! {
        #[test]
        fn prop_seeded_complaints_are_consistent(seed in any::<u64>()) {
            let data = seeded(seed);
            for c in &data.complaints {
                let types = types_for(&c.category).unwrap();
                prop_assert!(types.contains(&c.kind.as_str()));
                prop_assert!(CITIES.contains(&c.city.as_str()));
                prop_assert!(c.images.len() <= 3);
                prop_assert!(c.comments.len() <= 5);
                prop_assert!(c.likes.len() <= 50);
                if c.status == Status::Resolved {
                    prop_assert!(c.response.is_some());
                }
                if c.status == Status::Awaiting {
                    prop_assert!(c.response.is_none());
                }
            }
        }
    }
}
