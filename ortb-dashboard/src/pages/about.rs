use dioxus::prelude::*;

const GRIST_URL: &str =
    "https://grist.numerique.gouv.fr/o/docs/1yHHubK9LQYf/Donnees-Transport-ORTB?utm_id=share-doc";

#[component]
pub fn AboutPage() -> Element {
    rsx! {
        h1 { "ℹ️ À propos" }

        h2 { "Plateforme de visualisation des données de l'ORTB" }
        p {
            "Cette application permet de visualiser et d'explorer les indicateurs territoriaux "
            "à différentes échelles géographiques (communes et EPCI)."
        }

        h3 { "Fonctionnalités principales" }
        ul {
            li { "📍 Visualisation cartographique des indicateurs" }
            li { "📊 Analyse statistique des données" }
            li { "📥 Téléchargement des données brutes" }
            li { "🎯 Filtrage par thématique et période" }
        }

        h3 { "Sources de données" }
        ul {
            li { strong { "Données" } " : Sources renseignées pour chaque donnée sur la visualisation cartographique" }
            li { strong { "Géométries" } " : IGN - Admin Express" }
        }

        h3 { "Contact" }
        p { "Pour toute question ou suggestion :" }
        ul {
            li { "Email : " a { href: "mailto:ortb@i-carre.net", "ortb@i-carre.net" } }
            li { "Tél : 06 59 61 63 54" }
            li {
                "Site Internet de l'ORTB : "
                a { href: "https://www.observatoire-transports-bretagne.fr", "www.observatoire-transports-bretagne.fr" }
            }
        }

        h3 { "Version" }
        p { "Version 1.0 - Décembre 2025" }

        hr { style: "margin: 24px 0; border: none; border-top: 1px solid #e0e0e0;" }

        div {
            style: "display: flex; gap: 32px; flex-wrap: wrap;",
            div {
                style: "flex: 1; min-width: 240px;",
                h3 { "📚 Documentation" }
                ul {
                    li { a { href: GRIST_URL, target: "_blank", "Fichier Grist du projet" } }
                    li { "Guide d'utilisation" }
                    li { "Données publiées sur GéoBretagne" }
                }
            }
            div {
                style: "flex: 1; min-width: 240px;",
                h3 { "🔧 Technologies" }
                ul {
                    li { strong { "Framework" } " : Dioxus (WebAssembly)" }
                    li { strong { "Visualisation" } " : D3.js, SQLite" }
                    li { strong { "Cartes" } " : GeoJSON, IGN data" }
                }
            }
        }
    }
}
