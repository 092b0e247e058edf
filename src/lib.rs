//! Analytics core for a support-ticket dashboard: ingestion of ticket
//! exports, time-window filtering, KPI aggregation, search and pagination.

pub mod analyzer;
pub mod commands;
pub mod config;
pub mod error;
pub mod formatting;
pub mod parser;
pub mod repository;
pub mod state;

#[cfg(test)]
mod testing;

pub use analyzer::{DashboardKpi, TicketPage, TimeWindow};
pub use config::AppConfig;
pub use error::AppError;
pub use parser::types::{
    Department, Satisfaction, Ticket, TicketPriority, TicketReason, TicketStatus,
};
pub use repository::TicketRepository;
pub use state::{AppState, DashboardSelection, StateAccess};

// ─── E2E Integration Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod e2e_tests {
    use std::io::Write;
    use std::sync::Arc;
    use std::thread;

    use tempfile::NamedTempFile;

    use crate::analyzer::{build_dashboard_kpi, filter_by_window, paginate, search};
    use crate::commands::{config, dashboard, import, search as search_cmd};
    use crate::config::AppConfig;
    use crate::state::{AppState, StateAccess};
    use crate::testing::{dt, ticket};
    use crate::{TicketRepository, TicketStatus, TimeWindow};

    const EXPORT: &str = "\u{feff}ID;Data de Abertura;Data de Fechamento;Status;Prioridade;Motivo;Solução;Solicitante;Agente Responsável;Departamento;TMA;FRT;Satisfação
CHAMADO-10001;05/01/2024 08:15;;Aberto;Alta;Erro de Login;;Pedro Alves;João Silva;TI;45;8;Bom
CHAMADO-10002;10/01/2024 09:30;10/01/2024 11:00;Resolvido;Média;Impressora Não Funciona;Toner substituído;Mariana Costa;Rosa Brito;Vendas;90;12;Bom
CHAMADO-10003;01/02/2024 14:00;02/02/2024 10:00;Fechado;Urgente;Falha de Software;Reinstalação do aplicativo;Lucas Pereira;João Silva;Produção;1200;30;Regular
CHAMADO-10004;03/02/2024 10:00;;Pendente;Baixa;Backup de Dados;;Ana Souza;Yago Ferreira;Financeiro;60;;Médio
CHAMADO-10005;12/02/2024 16:45;;Em Andamento;Média;Lentidão do Sistema;;Carla Dias;Rosa Brito;Marketing;30;5;Bom
";

    fn write_export() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    /// E2E: three tickets, month window at 2024-02-15 keeps only the 2024-02-01 one
    #[test]
    fn test_e2e_month_window_status_counts() {
        let repo = TicketRepository::new(vec![
            ticket(1, "2024-01-05", TicketStatus::Open),
            ticket(2, "2024-01-10", TicketStatus::Resolved),
            ticket(3, "2024-02-01", TicketStatus::Closed),
        ])
        .unwrap();

        let now = dt("2024-02-15");
        let filtered = filter_by_window(repo.tickets(), TimeWindow::Month, now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].opened_at, dt("2024-02-01"));

        let kpi = build_dashboard_kpi(repo.tickets(), TimeWindow::Month, now, &AppConfig::default());
        assert_eq!(kpi.status_counts.closed, 1);
        for (status, count) in kpi.status_counts.iter() {
            if status != TicketStatus::Closed {
                assert_eq!(count, 0, "{status}");
            }
        }
    }

    /// E2E: CSV export → state → dashboard + table
    #[test]
    fn test_e2e_import_dashboard_and_table() {
        let file = write_export();
        let state = AppState::default();

        let result = import::import_csv(&state, file.path()).expect("import failed");
        // CHAMADO-10004 has an empty FRT and is skipped
        assert_eq!(result.total_tickets, 4);
        assert_eq!(result.skipped_rows, 1);
        assert_eq!(result.warnings[0].line, 5);

        let now = dt("2024-02-15 12:00");
        let kpi = dashboard::get_dashboard_kpi(&state, now).unwrap();
        assert_eq!(kpi.meta.total_tickets, 4);
        assert_eq!(kpi.status_counts.total(), 4);
        // (45 + 90 + 1200 + 30) / 4 = 341.25
        assert_eq!(kpi.avg_resolution_minutes, Some(341));
        assert_eq!(kpi.satisfaction_rate, 75);
        assert_eq!(kpi.top_agents[0].count, 2);
        assert_eq!(kpi.top_agents[0].label, "Rosa Brito");
        let trend_keys: Vec<&str> = kpi.priority_trend.iter().map(|p| p.period_key.as_str()).collect();
        assert_eq!(trend_keys, vec!["2024-01", "2024-02"]);

        let cards = dashboard::get_kpi_cards(&state, now).unwrap();
        assert_eq!(cards[3].value, "5h 41min");

        dashboard::set_time_window(&state, "month").unwrap();
        let table = search_cmd::search_tickets(&state, "silva", None, now).unwrap();
        assert_eq!(table.page.total_count, 1);
        assert_eq!(table.page.items[0].id, "CHAMADO-10003");
        assert_eq!(table.window, TimeWindow::Month);
    }

    /// E2E: smaller pages through configuration
    #[test]
    fn test_e2e_configured_page_size() {
        let file = write_export();
        let state = AppState::default();
        import::import_csv(&state, file.path()).unwrap();

        config::update_config(
            &state,
            AppConfig {
                page_size: 3,
                page_window: 3,
                ..AppConfig::default()
            },
        )
        .unwrap();

        let table = search_cmd::search_tickets(&state, "", Some(2), dt("2024-03-01")).unwrap();
        assert_eq!(table.page.total_pages, 2);
        assert_eq!(table.page.items.len(), 1);
        assert_eq!(table.page.items[0].id, "CHAMADO-10001");
        assert_eq!(table.page_numbers, vec![1, 2]);
    }

    /// Searching then paginating reproduces the filtered set exactly once
    #[test]
    fn test_e2e_pages_cover_search_results() {
        let tickets: Vec<_> = (1..=23)
            .map(|n| ticket(n, &format!("2024-01-{:02}", n), TicketStatus::Open))
            .collect();
        let repo = TicketRepository::new(tickets).unwrap();
        let filtered = filter_by_window(repo.tickets(), TimeWindow::All, dt("2024-02-01"));
        let found = search(&filtered, "chamado");

        let first = paginate(&found, 1, 10);
        let mut rebuilt = Vec::new();
        for p in 1..=first.total_pages {
            rebuilt.extend(paginate(&found, p, 10).items);
        }
        assert_eq!(rebuilt, found);
    }

    /// Dashboard and table read the same snapshot from several threads
    #[test]
    fn test_e2e_concurrent_readers() {
        let state = Arc::new(AppState::default());
        let tickets = (1..=40)
            .map(|n| ticket(n, &format!("2024-01-{:02}", (n % 28) + 1), TicketStatus::Open))
            .collect();
        import::load_tickets(&state, tickets).unwrap();

        let now = dt("2024-02-01");
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    if i % 2 == 0 {
                        dashboard::get_dashboard_kpi(&state, now).unwrap().meta.total_tickets
                    } else {
                        search_cmd::search_tickets(&state, "", None, now)
                            .unwrap()
                            .page
                            .total_count
                    }
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 40);
        }
        assert_eq!(state.with_repository(|repo| Ok(repo.len())).unwrap(), 40);
    }
}
