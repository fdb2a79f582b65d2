//! Static curriculum catalog for the fixed-curriculum mode: which course
//! codes belong to which (block, major, semester). Reference data only; the
//! engine never computes anything from it beyond lookups.

pub struct Block {
    pub key: &'static str,
    pub label: &'static str,
    pub majors: &'static [Major],
}

pub struct Major {
    pub key: &'static str,
    pub label: &'static str,
    semesters: &'static [&'static [&'static str]],
}

/// Catalog fallback when a major is unknown: the standard program length.
pub const DEFAULT_TOTAL_SEMESTERS: u32 = 9;

pub fn blocks() -> &'static [Block] {
    CATALOG
}

pub fn majors(block: &str) -> &'static [Major] {
    CATALOG
        .iter()
        .find(|b| b.key == block)
        .map(|b| b.majors)
        .unwrap_or(&[])
}

fn find_major(block: &str, major: &str) -> Option<&'static Major> {
    majors(block).iter().find(|m| m.key == major)
}

/// Course codes taught in one semester of a major; empty for unknown keys
/// or an out-of-range semester.
pub fn semester_courses(block: &str, major: &str, semester: u32) -> &'static [&'static str] {
    find_major(block, major)
        .and_then(|m| {
            let index = semester.checked_sub(1)? as usize;
            m.semesters.get(index)
        })
        .copied()
        .unwrap_or(&[])
}

pub fn total_semesters(block: &str, major: &str) -> u32 {
    find_major(block, major)
        .map(|m| m.semesters.len() as u32)
        .unwrap_or(DEFAULT_TOTAL_SEMESTERS)
}

static CATALOG: &[Block] = &[
    Block {
        key: "NgoaiNgu",
        label: "Khối ngành Ngoại ngữ",
        majors: &[
            Major {
                key: "BEN",
                label: "Ngôn ngữ Anh",
                semesters: &[
                    &["EAW212", "ECR202", "ENG303", "ENP102", "SSL101c"],
                    &["EAL202c", "EAW222", "ECB101", "LTG202", "SSG104"],
                    &["CHN113", "ERW412", "LIT301", "SEM101", "SSC302c"],
                    &["CHN123", "ECC302c", "EPC301", "ERW422", "ESL101"],
                    &["EBC301c", "ELI302", "ELT302", "ENB302", "VNC104"],
                    &["EPE301c", "OJE202"],
                    &["BEN_COM*1", "BEN_COM*2", "ELI402", "ELT402", "EXE101"],
                    &["BEN_COM*3", "BEN_COM*4", "ELR301", "EXE201", "MLN111", "MLN122"],
                    &["BEN_GRA_ELE", "HCM202", "MLN131", "VNR202"],
                ],
            },
            Major {
                key: "BJP_EN",
                label: "Ngôn ngữ Nhật",
                semesters: &[
                    &["JPD116", "JPD126", "SSL101c"],
                    &["ENP102", "JPD216", "JPD226"],
                    &["ECR301", "ENG303", "JPD316", "JPD326"],
                    &["EAW301", "JPD336", "JPD346"],
                    &["JIP301", "JSC301m", "JST301", "SSC302m", "SSG105"],
                    &["ENW492c", "OJP202"],
                    &["EXE101", "JEN_COM*1", "JEN_COM*2", "JJB391", "JLR302"],
                    &["EXE201", "JEN_COM*3", "JEN_COM*4", "MLN111", "MLN122"],
                    &["BJP_GRA_ELE", "HCM202", "MLN131", "VNR202"],
                ],
            },
            Major {
                key: "BKR_EN",
                label: "Ngôn ngữ Hàn",
                semesters: &[
                    &["ENP102", "KRL112", "MLN111", "MLN122", "SSL101c"],
                    &["KRL122", "KRL212", "MLN131"],
                    &["ENG303", "KRL222", "KRL312"],
                    &["ECR301", "KRL322", "KST401", "SSG105"],
                    &["EAW301", "KIL301", "KLP401", "KOS301", "KRL402"],
                    &["ENW492c", "OJK202"],
                    &["BKR_EN_COM*1", "EXE101", "KRL502", "SSC302m"],
                    &["BKR_EN_COM*2", "BKR_EN_COM*3", "BKR_EN_COM*4", "EXE201", "KAW402"],
                    &["BKR_GRA_ELE", "HCM202", "VNR202"],
                ],
            },
            Major {
                key: "BCH_EN",
                label: "Ngôn ngữ Trung Quốc",
                semesters: &[
                    &["CHI111", "CHI121", "CHS111", "SSL101c"],
                    &["CHI311", "CHS121", "ENP102"],
                    &["CHI321", "CHI331", "CHS201", "ECR301", "ENG303"],
                    &["CHI401", "CHS301", "CPL401", "EAW301"],
                    &["CCS401", "CHG401", "CHS401", "CTI401", "SSG105"],
                    &["ENW492c", "OJC202"],
                    &["CEN_COM*1", "CEN_COM*2", "CRM401", "EXE101", "SSC302m"],
                    &["CEN_COM*3", "CEN_COM*4", "EXE201", "MLN111", "MLN122"],
                    &["BCH_GRA_ELE", "HCM202", "MLN131", "VNR202"],
                ],
            },
        ],
    },
    Block {
        key: "KinhTe",
        label: "Khối ngành Kinh tế",
        majors: &[
            Major {
                key: "Marketing",
                label: "Marketing",
                semesters: &[
                    &["ECO111", "ENM301", "MGT103", "MKT101", "SSL101c"],
                    &["ACC101", "ECO121", "ENM401", "OBE102c", "SSG104"],
                    &["FIN202", "MKT304", "MKT201", "HRM202c", "DMS301m"],
                    &["CHN113", "DMA301m", "ITA203c", "MAS202", "MKT202"],
                    &["CHN123", "DTG111", "MKT208c", "SAL301", "SSB201"],
                    &["ENW492c", "OJB202"],
                    &["EXE101", "LAW102", "MKT_COM*1", "MKT_COM*2", "MKT_COM*3"],
                    &["EXE201", "MKT_COM*4", "MKT301", "MLN111", "MLN122", "PMG201c"],
                    &["HCM202", "MKT_GRA_ELE", "MLN131", "VNR202"],
                ],
            },
            Major {
                key: "QTKD",
                label: "Quản trị kinh doanh",
                semesters: &[
                    &["ACC101", "ECO111", "ENM302", "MGT103", "SSA101"],
                    &["ECO121", "ENM402", "FIN202", "MKT101", "OBE102c"],
                    &["DMS301m", "DTG111", "MAS202", "MKT201", "MKT208c"],
                    &["BDT202c", "CHN113", "MKT202", "MKT304", "SSG105"],
                    &["CHN123", "DMA301m", "EEC101", "HRM202c", "SAL301"],
                    &["ENW492c", "OJB202"],
                    &["EXE101", "LAW102", "MKT_COM*1", "MKT_COM*2", "MKT_COM*3"],
                    &["EXE201", "MKT_COM*4", "MKT301", "MLN111", "MLN122", "PMG201c"],
                    &["HCM202", "MKT_GRA_ELE", "MLN131", "VNR202"],
                ],
            },
            Major {
                key: "Logistics",
                label: "Quản lý logistics và chuỗi cung ứng toàn cầu",
                semesters: &[
                    &["ECO102", "ENM302", "MGT103", "MKT101", "SSL101c"],
                    &["ACC101", "ENM402", "OBE102c", "SCM202", "SSG104"],
                    &["FIN202", "GLI201", "GLT301", "HRM202c", "SCM302"],
                    &["BDT202c", "CHN113", "GLA301", "GSF301", "MAS202"],
                    &["MAS202", "GLC301", "GLH301", "SAP312", "SSB201"],
                    &["ENW492c", "OJB202"],
                    &["EXE101", "GL_COM*1", "GL_COM*2", "GL_COM*3", "LAW102"],
                    &["EXE201", "GL_COM*4", "MLN111", "MLN122", "PMG201c", "RMB302"],
                    &["GL_GRA_ELE", "HCM202", "MLN131", "VNR202"],
                ],
            },
            Major {
                key: "TaiChinh",
                label: "Tài chính",
                semesters: &[
                    &["ACC101", "ECO111", "ENM301", "MGT103", "SSL101c"],
                    &["ECO121", "ENM401", "FIN202", "OBE102c", "SSG104"],
                    &["ACC302", "FIN201", "FIN303", "HRM202c", "MKT101"],
                    &["ACC305", "CHN113", "FIN301", "ITA203c", "MAS202"],
                    &["CHN123", "FIM302c", "FIN402", "RMB302", "SSB201"],
                    &["ENW492c", "OJB202"],
                    &["EXE101", "FIN_COM*1", "FIN_COM*2", "FIN_COM*3", "LAW102"],
                    &["BKG303", "EXE201", "FIN_COM*4", "MLN111", "MLN122", "PMG201c"],
                    &["FIN_GRA_ELE", "HCM202", "MLN131", "VNR202"],
                ],
            },
        ],
    },
    Block {
        key: "CNTT",
        label: "Khối ngành Công nghệ thông tin",
        majors: &[
            Major {
                key: "SE",
                label: "Kĩ thuật phần mềm",
                semesters: &[
                    &["CEA201", "CSI106", "MAE101", "PRF192", "SSA101"],
                    &["MAD101", "NWC204", "OSG202", "PRO192", "WED201c"],
                    &["DBI202", "JPD113", "LAB211", "MAS291", "SWE202c"],
                    &["CSD201", "IOT102", "JPD123", "PRJ301", "SWR302"],
                    &["SE_COM*1", "SSG105", "SWP391", "SWT301", "WDU203c"],
                    &["ENW493c", "OJT202"],
                    &["EXE101", "PMG201c", "SE_COM*2", "SE_COM*3", "SWD392"],
                    &["EXE201", "ITE302c", "MLN111", "MLN122", "PRM393", "SE_COM*4_ELE"],
                    &["HCM202", "MLN131", "SE_GRA_ELE", "VNR202"],
                ],
            },
            Major {
                key: "AI",
                label: "Trí tuệ nhân tạo",
                semesters: &[
                    &["CSI106", "MAD101", "MAE101", "PFP191", "SSL101c"],
                    &["AIG202c", "CEA201", "CSD203", "DBI202", "JPD113"],
                    &["ADY201m", "ITE303c", "JPD123", "MAI391", "MAS291"],
                    &["AIL303m", "CPV301", "DAP391m", "SSG105", "SWE201c"],
                    &["AI17_COM*1", "AI17_COM*2", "DPL302m", "DWP301c"],
                    &["NLP301c", "OJT202"],
                    &["AI17_COM*3", "DAT301m", "ENW493c", "EXE101", "PMG201c"],
                    &["AI17_COM*4", "AID301c", "EXE201", "MLN111", "MLN122", "REL301m"],
                    &["AI17_GRA_ELE", "HCM202", "MLN131", "VNR202"],
                ],
            },
            Major {
                key: "IA",
                label: "An Toàn Thông Tin",
                semesters: &[
                    &["CEA201", "CSI106", "MAE101", "PFP191", "SSL101c"],
                    &["APO201c", "IOT102", "MAD101", "NWC204", "OSG20x"],
                    &["CSD203", "DBI202", "IA_ELE2", "JPD113", "NWC303"],
                    &["AIC211", "ITE302c", "JPD123", "MAS291", "SSG105"],
                    &["CRY303c", "FRS301", "IAA202", "IAM302", "PWD301"],
                    &["ENW493c", "OJT202"],
                    &["EXE101", "HOD402", "IA_COM*1", "IA_COM*2", "IAP301"],
                    &["EXE201", "IA_COM*3", "IA_COM*4", "MLN111", "MLN122", "PMG201c"],
                    &["HCM202", "IA_GRA_ELE", "MLN131", "VNR202"],
                ],
            },
            Major {
                key: "IS",
                label: "Hệ thống thông tin",
                semesters: &[
                    &["CEA201", "CSI106", "MAE101", "PRF192", "SSL101c"],
                    &["JPD113", "MAD101", "NWC204", "OSG202", "PRO192"],
                    &["CSD201", "DBI202", "ITA203c", "JPD123", "LAB211"],
                    &["MAS291", "PRC392c", "PRJ302", "SSG105", "SWE201c"],
                    &["IS_COM*1", "ISM302", "ISP392", "ITA301", "ITE302c"],
                    &["ENW493c", "OJT202"],
                    &["EXE101", "IS_COM*2", "IS_COM*3", "ISC301", "ITB302c"],
                    &["DTA301", "EXE201", "IS_COM*4", "MLN111", "MLN122", "PMG21c"],
                    &["HCM202", "IS_GRA_ELE", "MLN131", "VNR202"],
                ],
            },
        ],
    },
];
