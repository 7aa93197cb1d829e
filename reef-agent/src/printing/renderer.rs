//! Ticket renderer
//!
//! Renders test pages and order tickets into ESC/POS byte streams for the
//! dispatch engine. Pure rendering, no I/O.

use chrono::Local;
use reef_printer::EscPosBuilder;

use super::types::Order;
use crate::discovery::types::Printer;

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const FOOTER: &str = "Reef POS - Sistema de Gestao";

/// Renders tickets for thermal printers
pub struct TicketRenderer {
    width: usize,
}

impl TicketRenderer {
    /// Create a renderer with the paper width in characters
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Render a test page for the given printer
    pub fn test_page(&self, printer: &Printer) -> Vec<u8> {
        let mut b = EscPosBuilder::new(self.width);

        b.center();
        b.size_large();
        b.line("TESTE DE IMPRESSAO");
        b.size_normal();
        b.newline();

        b.left();
        b.sep_double();
        b.line("Reef Print Agent");
        b.line(&format!("Versao: {}", env!("CARGO_PKG_VERSION")));
        b.line(&format!("Data: {}", Local::now().format(DATE_FORMAT)));
        b.newline();
        b.line(&format!("Impressora: {}", printer.name));
        b.line(&format!("Tipo: {}", printer.transport.as_str()));
        if let Some(ip) = &printer.ip {
            b.line(&format!("IP: {}:{}", ip, printer.port.unwrap_or(9100)));
        }
        b.sep_double();

        b.center();
        b.newline();
        b.line("Impressao OK!");
        b.feed(4);
        b.cut();

        b.build()
    }

    /// Render an order ticket
    pub fn order(&self, order: &Order) -> Vec<u8> {
        let mut b = EscPosBuilder::new(self.width);

        self.render_header(&mut b, order);
        self.render_details(&mut b, order);
        self.render_items(&mut b, order);
        self.render_footer(&mut b, order);

        b.build()
    }

    /// Table or counter label, large and centered
    fn render_header(&self, b: &mut EscPosBuilder, order: &Order) {
        b.center();
        b.size_large();

        if let Some(mesa) = &order.mesa {
            b.line(&format!("MESA {}", mesa));
        } else if let Some(balcao) = &order.balcao {
            b.line(&format!("BALCAO {}", balcao));
        }

        b.size_normal();
        b.left();
        b.sep_double();
    }

    /// Order number, timestamp and waiter
    fn render_details(&self, b: &mut EscPosBuilder, order: &Order) {
        let numero = order
            .numero
            .clone()
            .or_else(|| order.id.as_ref().map(|id| id.chars().take(8).collect()));
        if let Some(numero) = numero {
            b.line(&format!("Pedido: #{}", numero));
        }

        b.line(&format!("Data: {}", Local::now().format(DATE_FORMAT)));

        if let Some(garcom) = &order.garcom {
            b.line(&format!("Garcom: {}", garcom));
        }

        b.sep_single();
    }

    /// One line per item, with an indented note when present
    fn render_items(&self, b: &mut EscPosBuilder, order: &Order) {
        for item in &order.itens {
            b.line(&format!("{}x {}", item.quantidade, item.nome));

            if let Some(obs) = &item.observacoes
                && !obs.is_empty()
            {
                b.line(&format!("   OBS: {}", obs));
            }
        }

        b.sep_single();
    }

    /// Trailing order note, centered footer, feed and cut
    fn render_footer(&self, b: &mut EscPosBuilder, order: &Order) {
        if let Some(obs) = &order.observacoes
            && !obs.is_empty()
        {
            b.line(&format!("OBS: {}", obs));
            b.sep_single();
        }

        b.center();
        b.line(FOOTER);
        b.left();

        b.feed(4);
        b.cut();
    }
}

impl Default for TicketRenderer {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::types::{Availability, Transport};
    use crate::printing::types::OrderItem;

    fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
        haystack[from..]
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|p| p + from)
    }

    fn sample_order() -> Order {
        Order {
            numero: Some("42".to_string()),
            itens: vec![OrderItem {
                quantidade: 2,
                nome: "Coffee".to_string(),
                observacoes: None,
            }],
            ..Order::default()
        }
    }

    #[test]
    fn test_order_renders_reset_number_items_cut_in_order() {
        let data = TicketRenderer::new(32).order(&sample_order());

        let reset = find(&data, &[0x1B, 0x40], 0).expect("reset code");
        let numero = find(&data, b"42", reset).expect("order number after reset");
        let item = find(&data, b"2x Coffee", numero).expect("item line after number");
        find(&data, &[0x1D, 0x56, 0x00], item).expect("cut after items");
    }

    #[test]
    fn test_order_omits_missing_optionals() {
        let data = TicketRenderer::new(32).order(&sample_order());

        assert!(find(&data, b"Garcom", 0).is_none());
        assert!(find(&data, b"OBS", 0).is_none());
        assert!(find(&data, b"MESA", 0).is_none());
    }

    #[test]
    fn test_order_mesa_wins_over_balcao() {
        let order = Order {
            mesa: Some("12".to_string()),
            balcao: Some("3".to_string()),
            ..sample_order()
        };
        let data = TicketRenderer::new(32).order(&order);

        assert!(find(&data, b"MESA 12", 0).is_some());
        assert!(find(&data, b"BALCAO", 0).is_none());
    }

    #[test]
    fn test_order_item_note_is_indented() {
        let order = Order {
            itens: vec![OrderItem {
                quantidade: 1,
                nome: "Burger".to_string(),
                observacoes: Some("sem cebola".to_string()),
            }],
            ..sample_order()
        };
        let data = TicketRenderer::new(32).order(&order);

        let item = find(&data, b"1x Burger", 0).expect("item line");
        find(&data, b"   OBS: sem cebola", item).expect("indented note after item");
    }

    #[test]
    fn test_order_number_falls_back_to_id_prefix() {
        let order = Order {
            numero: None,
            id: Some("abcdef1234567890".to_string()),
            ..sample_order()
        };
        let data = TicketRenderer::new(32).order(&order);

        assert!(find(&data, b"Pedido: #abcdef12", 0).is_some());
    }

    #[test]
    fn test_test_page_mentions_printer() {
        let printer = Printer {
            id: "net-192-168-1-100".to_string(),
            name: "Impressora 192.168.1.100".to_string(),
            transport: Transport::Network,
            ip: Some("192.168.1.100".to_string()),
            port: Some(9100),
            driver_name: None,
            port_name: None,
            status: Availability::Online,
        };
        let data = TicketRenderer::new(32).test_page(&printer);

        assert!(find(&data, b"TESTE DE IMPRESSAO", 0).is_some());
        assert!(find(&data, b"Impressora 192.168.1.100", 0).is_some());
        assert!(find(&data, b"IP: 192.168.1.100:9100", 0).is_some());
        assert!(data.ends_with(&[0x1D, 0x56, 0x00]));
    }
}
