use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LANG: &str = "en";

const EN: &[(&str, &str)] = &[
    ("error.invalid_action", "Invalid action: {action}"),
    ("error.validation", "One or more fields are invalid: {detail}"),
    ("error.voucher_not_found", "Voucher #{id} not found"),
    ("error.loan_not_found", "Loan #{id} not found"),
    ("error.item_not_found", "Item ID {id} not found"),
    ("error.category_not_found", "Category #{id} not found"),
    ("error.matrix_rule_not_found", "Matrix rule #{id} not found"),
    ("error.document_not_found", "Document #{id} not found"),
    ("error.voucher_already_processed", "Voucher #{id} has already been processed"),
    ("error.loan_already_returned", "Loan #{id} has already been returned or closed"),
    ("error.out_of_stock", "Item ID {id} is out of stock"),
    ("error.internal", "An unexpected error occurred."),
    ("input.malformed_body", "Malformed request: {detail}"),
    ("input.missing_field", "Missing required field: {detail}"),
    ("input.empty_voucher", "A voucher needs at least one item"),
    ("input.non_positive_quantity", "Quantities must be greater than zero"),
    ("input.no_approved_lines", "Cannot approve without any items. Reject the voucher instead"),
    ("input.empty_category_name", "Category name cannot be empty."),
    ("input.rating_out_of_range", "Rating must be between 1 and 5"),
    ("input.invalid_base64", "The uploaded file is not valid Base64"),
    ("status.pending", "Pending"),
    ("status.approved", "Approved"),
    ("status.partially_approved", "Partially approved"),
    ("status.rejected", "Rejected"),
    ("status.completed", "Completed"),
    ("status.on_loan", "On loan"),
    ("status.returned", "Returned"),
    ("activity.issue_voucher", "Voucher #{id} by {user} ({status})"),
    ("activity.loan", "Borrowed: {item} by {borrower}"),
    ("activity.return", "Returned: {item} by {borrower}"),
    ("activity.receive", "Received: {item} x{quantity}"),
    ("activity.unknown_item", "Unknown"),
    ("voucher.note_approved", "Approved by Admin"),
    ("voucher.note_rejected", "Rejected by Admin"),
    ("voucher.note_partial", "Partially approved:"),
    ("notify.receipt_confirmed", "📦 Receipt confirmed\n\nVoucher #{id}\nReceiver: {receiver}\nTime: {time}"),
];

const PT: &[(&str, &str)] = &[
    ("error.invalid_action", "Ação inválida: {action}"),
    ("error.validation", "Um ou mais campos são inválidos: {detail}"),
    ("error.voucher_not_found", "Ficha #{id} não encontrada"),
    ("error.loan_not_found", "Empréstimo #{id} não encontrado"),
    ("error.item_not_found", "Item ID {id} não encontrado"),
    ("error.category_not_found", "Categoria #{id} não encontrada"),
    ("error.matrix_rule_not_found", "Regra da matriz #{id} não encontrada"),
    ("error.document_not_found", "Documento #{id} não encontrado"),
    ("error.voucher_already_processed", "A ficha #{id} já foi processada"),
    ("error.loan_already_returned", "O empréstimo #{id} já foi devolvido ou encerrado"),
    ("error.out_of_stock", "Item ID {id} sem estoque"),
    ("error.internal", "Ocorreu um erro inesperado."),
    ("input.malformed_body", "Requisição inválida: {detail}"),
    ("input.missing_field", "Campo obrigatório ausente: {detail}"),
    ("input.empty_voucher", "A ficha precisa de pelo menos um item"),
    ("input.non_positive_quantity", "As quantidades devem ser maiores que zero"),
    ("input.no_approved_lines", "Não é possível aprovar sem itens. Rejeite a ficha"),
    ("input.empty_category_name", "O nome da categoria não pode ser vazio."),
    ("input.rating_out_of_range", "A nota deve estar entre 1 e 5"),
    ("input.invalid_base64", "O arquivo enviado não é Base64 válido"),
    ("status.pending", "Aguardando aprovação"),
    ("status.approved", "Aprovada"),
    ("status.partially_approved", "Aprovada parcialmente"),
    ("status.rejected", "Rejeitada"),
    ("status.completed", "Concluído"),
    ("status.on_loan", "Emprestado"),
    ("status.returned", "Devolvido"),
    ("activity.issue_voucher", "Ficha #{id} por {user} ({status})"),
    ("activity.loan", "Empréstimo: {item} por {borrower}"),
    ("activity.return", "Devolução: {item} por {borrower}"),
    ("activity.receive", "Recebimento: {item} x{quantity}"),
    ("activity.unknown_item", "Desconhecido"),
    ("voucher.note_approved", "Aprovada pelo Admin"),
    ("voucher.note_rejected", "Rejeitada pelo Admin"),
    ("voucher.note_partial", "Aprovação parcial:"),
    ("notify.receipt_confirmed", "📦 Recebimento confirmado\n\nFicha #{id}\nRecebedor: {receiver}\nHorário: {time}"),
];

const TH: &[(&str, &str)] = &[
    ("error.invalid_action", "คำสั่งไม่ถูกต้อง: {action}"),
    ("error.validation", "ข้อมูลไม่ถูกต้อง: {detail}"),
    ("error.voucher_not_found", "ไม่พบใบเบิก #{id}"),
    ("error.loan_not_found", "ไม่พบรายการยืม #{id}"),
    ("error.item_not_found", "ไม่พบอุปกรณ์ ID: {id}"),
    ("error.category_not_found", "ไม่พบหมวดหมู่ #{id}"),
    ("error.matrix_rule_not_found", "ไม่พบกฎ PPE Matrix #{id}"),
    ("error.document_not_found", "ไม่พบเอกสาร #{id}"),
    ("error.voucher_already_processed", "ใบเบิก #{id} ถูกจัดการไปแล้ว"),
    ("error.loan_already_returned", "รายการยืม #{id} ถูกคืนหรือจัดการไปแล้ว"),
    ("error.out_of_stock", "อุปกรณ์ ID: {id} หมดสต็อก"),
    ("error.internal", "เกิดข้อผิดพลาดที่ไม่คาดคิด"),
    ("input.malformed_body", "คำขอไม่ถูกต้อง: {detail}"),
    ("input.missing_field", "ข้อมูลไม่ครบ: {detail}"),
    ("input.empty_voucher", "ใบเบิกต้องมีอย่างน้อยหนึ่งรายการ"),
    ("input.non_positive_quantity", "จำนวนต้องมากกว่าศูนย์"),
    ("input.no_approved_lines", "ไม่สามารถอนุมัติโดยไม่มีรายการสินค้าได้ กรุณาปฏิเสธใบเบิกแทน"),
    ("input.empty_category_name", "ชื่อหมวดหมู่ต้องไม่ว่าง"),
    ("input.rating_out_of_range", "คะแนนต้องอยู่ระหว่าง 1 ถึง 5"),
    ("input.invalid_base64", "ไฟล์ที่อัปโหลดไม่ใช่ Base64 ที่ถูกต้อง"),
    ("status.pending", "รออนุมัติ"),
    ("status.approved", "อนุมัติแล้ว"),
    ("status.partially_approved", "อนุมัติบางส่วน"),
    ("status.rejected", "ถูกปฏิเสธ"),
    ("status.completed", "สำเร็จ"),
    ("status.on_loan", "กำลังยืม"),
    ("status.returned", "คืนแล้ว"),
    ("activity.issue_voucher", "ใบเบิก #{id} โดย {user} ({status})"),
    ("activity.loan", "ยืม: {item} โดย {borrower}"),
    ("activity.return", "คืน: {item} โดย {borrower}"),
    ("activity.receive", "รับของ: {item} x{quantity}"),
    ("activity.unknown_item", "Unknown"),
    ("voucher.note_approved", "อนุมัติโดย Admin"),
    ("voucher.note_rejected", "ปฏิเสธโดย Admin"),
    ("voucher.note_partial", "อนุมัติบางส่วน:"),
    ("notify.receipt_confirmed", "📦 ยืนยันรับของแล้ว\n\nใบเบิก #{id}\nผู้รับ: {receiver}\nเวลา: {time}"),
];

/// Catálogo de mensagens por idioma. Idioma desconhecido cai no `DEFAULT_LANG`,
/// chave desconhecida volta a própria chave.
#[derive(Clone)]
pub struct I18nStore {
    catalogs: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        for (lang, entries) in [("en", EN), ("pt", PT), ("th", TH)] {
            catalogs.insert(lang, entries.iter().copied().collect::<HashMap<_, _>>());
        }
        Self { catalogs: Arc::new(catalogs) }
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.catalogs.contains_key(lang)
    }

    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|catalog| catalog.get(key)))
            .copied()
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}
